//! Headless runner: a scripted session on a manual clock.
//!
//! ```text
//! flip-runner headless [--frames N] [--taps T1,T2,..] [--sections T1,T2,..]
//!                      [--air-action doubleJump|gravitySwitch]
//!                      [--ground centerLine|walls] [--tap-window-ms MS]
//! ```
//!
//! Frames are [`FRAME_MS`] apart starting at t=0. Each simulated tick writes
//! one JSON snapshot line, so two runs with the same arguments produce
//! identical output.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::core::SimConfig;
use crate::session::Session;
use crate::settings::{parse_air_action, parse_ground_mode};
use crate::types::{GameAction, GameState, DOUBLE_TAP_WINDOW_MS, FRAME_MS};

pub const DEFAULT_FRAMES: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConfig {
    pub frames: u64,
    /// Touch-start times in ms; each tap is released immediately
    pub taps: Vec<u64>,
    /// Times at which the run enters its next section
    pub sections: Vec<u64>,
    pub sim: SimConfig,
    pub tap_window_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES,
            taps: Vec::new(),
            sections: Vec::new(),
            sim: SimConfig::default(),
            tap_window_ms: DOUBLE_TAP_WINDOW_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessSummary {
    pub ticks: u64,
    pub final_state: GameState,
}

/// Parse `headless ...` arguments. Returns `Ok(None)` for any other subcommand.
///
/// `base` supplies defaults (typically from the environment).
pub fn parse_headless_args(
    args: &[String],
    base: HeadlessConfig,
) -> Result<Option<HeadlessConfig>> {
    if args.first().map(String::as_str) != Some("headless") {
        return Ok(None);
    }

    let mut config = base;
    let mut i = 1usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .ok_or_else(|| anyhow!("headless: missing value for {}", flag))
        };
        match flag {
            "--frames" => {
                let v = value()?;
                config.frames = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("headless: invalid --frames value: {}", v))?;
            }
            "--taps" => config.taps = parse_times(value()?).context("headless: --taps")?,
            "--sections" => {
                config.sections = parse_times(value()?).context("headless: --sections")?
            }
            "--air-action" => {
                let kind = parse_air_action(value()?).context("headless: --air-action")?;
                config.sim = config.sim.with_air_action(kind);
            }
            "--ground" => {
                let mode = parse_ground_mode(value()?).context("headless: --ground")?;
                config.sim = config.sim.with_ground_mode(mode);
            }
            "--tap-window-ms" => {
                let v = value()?;
                config.tap_window_ms = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("headless: invalid --tap-window-ms value: {}", v))?;
            }
            other => return Err(anyhow!("headless: unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Some(config))
}

/// Comma-separated millisecond timestamps, sorted.
fn parse_times(s: &str) -> Result<Vec<u64>> {
    let mut times = s
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<u64>().map_err(|_| anyhow!("invalid time: {}", t)))
        .collect::<Result<Vec<_>>>()?;
    times.sort_unstable();
    Ok(times)
}

/// Run the scripted session, writing one JSON snapshot per tick to `out`.
///
/// Stops early once the game is over.
pub fn run_headless<W: Write>(config: &HeadlessConfig, out: &mut W) -> Result<HeadlessSummary> {
    let mut session = Session::new(config.sim, config.tap_window_ms);
    session.apply_action(GameAction::Start, 0);

    let mut taps = config.taps.iter().copied().peekable();
    let mut sections = config.sections.iter().copied().peekable();
    let mut written = 0u64;

    for frame in 1..=config.frames {
        let now = frame * FRAME_MS;

        while let Some(t) = taps.next_if(|t| *t <= now) {
            session.apply_action(GameAction::TouchStart, t);
            session.apply_action(GameAction::TouchEnd, t);
        }
        while let Some(t) = sections.next_if(|t| *t <= now) {
            session.next_section(t);
        }

        session.advance(now);

        let game = session.game();
        if game.frame_count() > written {
            written = game.frame_count();
            serde_json::to_writer(&mut *out, &game.snapshot())?;
            out.write_all(b"\n")?;
        }
        if game.state().is_terminal() {
            break;
        }
    }
    out.flush()?;

    let summary = HeadlessSummary {
        ticks: written,
        final_state: session.state(),
    };
    info!(ticks = summary.ticks, state = summary.final_state.as_str(), "headless run finished");
    Ok(summary)
}
