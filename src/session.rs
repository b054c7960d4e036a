//! Host-side glue: one game loop plus its tap classifier.
//!
//! Both the terminal host and the headless runner drive a [`Session`]: they
//! translate their input into [`GameAction`]s and call [`Session::advance`]
//! once per host frame with the current time.

use tracing::{debug, info};

use crate::core::{FrameQueue, GameLoop, GameWorld, Player, SimConfig, SimEvent, Vec3};
use crate::input::TouchClassifier;
use crate::types::{
    GameAction, GameState, GroundMode, Orientation, RotationDirection, PLAYER_START_X,
};

/// How long the player sprite flashes after taking a hit.
pub const HIT_FLASH_MS: u64 = 200;

/// Player and world placed for the start of a run.
pub fn initial_bodies(sim: &SimConfig) -> (Player, GameWorld) {
    match sim.ground_mode {
        GroundMode::CenterLine => (Player::new(), GameWorld::new()),
        GroundMode::Walls => {
            let mut player = Player::at(Vec3::new(PLAYER_START_X, 0.0, 0.0));
            player.is_grounded = true;
            (player, GameWorld::rotated(Orientation::Deg0))
        }
    }
}

#[derive(Debug)]
pub struct Session {
    game: GameLoop<FrameQueue>,
    classifier: TouchClassifier,
    sim: SimConfig,
    tap_window_ms: u64,
    last_hit_ms: Option<u64>,
}

impl Session {
    pub fn new(sim: SimConfig, tap_window_ms: u64) -> Self {
        let mut game = GameLoop::new(sim);
        let (player, world) = initial_bodies(&sim);
        game.set_player(player);
        game.set_world(world);
        info!(
            air_action = sim.air_action.as_str(),
            ground = sim.ground_mode.as_str(),
            tap_window_ms,
            "session created"
        );
        Self {
            game,
            classifier: TouchClassifier::with_window_ms(tap_window_ms),
            sim,
            tap_window_ms,
            last_hit_ms: None,
        }
    }

    pub fn game(&self) -> &GameLoop<FrameQueue> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameLoop<FrameQueue> {
        &mut self.game
    }

    pub fn classifier(&self) -> &TouchClassifier {
        &self.classifier
    }

    pub fn sim(&self) -> &SimConfig {
        &self.sim
    }

    pub fn state(&self) -> GameState {
        self.game.state()
    }

    /// Whether the last obstacle hit is recent enough to flash the player.
    pub fn hit_flash(&self, now_ms: u64) -> bool {
        self.last_hit_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < HIT_FLASH_MS)
    }

    /// Apply one host action at `now_ms`. Returns whether anything changed.
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> bool {
        debug!(action = action.as_str(), now_ms, "action");
        match action {
            GameAction::TouchStart => {
                let mut applied = false;
                for intent in self.classifier.touch_start_at(now_ms) {
                    applied |= self.game.apply_intent(intent);
                }
                applied
            }
            GameAction::TouchEnd => {
                self.classifier.touch_end();
                false
            }
            GameAction::GravitySwitch => {
                self.game.state().is_playing() && self.game.gravity_switch()
            }
            GameAction::RotateCw => self.rotate(RotationDirection::Clockwise, now_ms),
            GameAction::RotateCcw => self.rotate(RotationDirection::CounterClockwise, now_ms),
            GameAction::Start => self.game.start(now_ms),
            GameAction::Pause => match self.game.state() {
                GameState::Playing => self.game.pause(),
                GameState::Paused => self.game.resume(now_ms),
                _ => false,
            },
            GameAction::Restart => {
                *self = Session::new(self.sim, self.tap_window_ms);
                true
            }
        }
    }

    /// Advance to the next section and run its scripted rotation.
    pub fn next_section(&mut self, now_ms: u64) -> bool {
        if !self.rotation_allowed() {
            return false;
        }
        let next = self.game.world().map_or(0, |w| w.current_section + 1);
        self.game.enter_section(next, now_ms)
    }

    /// One host frame: fire an expired single tap, deliver every frame the
    /// loop and the rotator asked for, then drain the loop's events.
    /// Returns how many frames ran.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        if let Some(intent) = self.classifier.poll_at(now_ms) {
            self.game.apply_intent(intent);
        }
        let mut delivered = 0;
        for handle in self.game.scheduler_mut().take_ready() {
            if self.game.on_frame(handle, now_ms) {
                delivered += 1;
            }
        }
        for event in self.game.take_events() {
            self.on_event(event, now_ms);
        }
        delivered
    }

    fn on_event(&mut self, event: SimEvent, now_ms: u64) {
        match event {
            SimEvent::ObstacleHit { id, kind, hp } => {
                self.last_hit_ms = Some(now_ms);
                info!(id, kind = kind.as_str(), hp, "player hit");
            }
            SimEvent::RotationComplete(rotation) => {
                debug!(degrees = rotation.degrees(), "rotation complete");
            }
            SimEvent::GameOver => {
                info!(frames = self.game.frame_count(), "game over");
            }
        }
    }

    // Rotation only redefines gravity meaningfully for the four-wall world.
    fn rotation_allowed(&self) -> bool {
        self.sim.ground_mode == GroundMode::Walls && self.game.state().is_playing()
    }

    fn rotate(&mut self, direction: RotationDirection, now_ms: u64) -> bool {
        self.rotation_allowed() && self.game.rotate_world(direction, now_ms)
    }
}
