//! Terminal runner (default binary).
//!
//! `flip-runner` plays interactively; `flip-runner headless ...` runs a
//! scripted session and prints JSON snapshots (see [`flip_runner::headless`]).

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info};

use flip_runner::headless::{parse_headless_args, run_headless, HeadlessConfig};
use flip_runner::input::{handle_key_event, should_quit};
use flip_runner::logging;
use flip_runner::session::Session;
use flip_runner::settings::Settings;
use flip_runner::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use flip_runner::types::{GameAction, FRAME_MS};

/// Terminals rarely report key releases; a tap is released this long after it starts.
const SYNTHETIC_RELEASE_MS: u64 = 80;

fn main() -> Result<()> {
    let settings = Settings::from_env().context("invalid environment configuration")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let base = HeadlessConfig {
        sim: settings.sim,
        tap_window_ms: settings.tap_window_ms,
        ..HeadlessConfig::default()
    };
    if let Some(config) = parse_headless_args(&args, base)? {
        logging::init_stderr()?;
        let stdout = io::stdout();
        let mut out = io::BufWriter::new(stdout.lock());
        run_headless(&config, &mut out)?;
        return Ok(());
    }

    logging::init_file(&settings.log_file)?;
    info!(log_file = %settings.log_file.display(), "starting terminal host");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &settings);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!("terminal host failed: {:#}", e);
    }
    result
}

fn run(term: &mut TerminalRenderer, settings: &Settings) -> Result<()> {
    let mut session = Session::new(settings.sim, settings.tap_window_ms);
    let view = GameView::new(settings.sim.ground_mode);
    let mut fb = FrameBuffer::new(0, 0);

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;
    let frame = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();
    let mut release_at: Option<u64> = None;

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snap = session.game().snapshot();
        let view = view.with_hit_flash(session.hit_flash(now_ms()));
        view.render_into(&snap, session.game().obstacles(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        let timeout = frame.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Repeat => {
                    if should_quit(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        let now = now_ms();
                        if action == GameAction::TouchStart {
                            release_at = Some(now + SYNTHETIC_RELEASE_MS);
                        }
                        session.apply_action(action, now);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Frame.
        if last_frame.elapsed() >= frame {
            last_frame = Instant::now();
            let now = now_ms();
            if release_at.is_some_and(|t| now >= t) {
                release_at = None;
                session.apply_action(GameAction::TouchEnd, now);
            }
            session.advance(now);
        }
    }
}
