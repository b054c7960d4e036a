//! Game loop and lifecycle state machine.
//!
//! The loop owns the player, the world, and the obstacle list, and is the only
//! place they are mutated. It never sleeps or spins: it asks its
//! [`FrameScheduler`] for the next frame while playing, and the host calls
//! [`GameLoop::on_frame`] with the handle when that frame fires.
//!
//! # Lifecycle
//!
//! ```text
//! Menu --start--> Playing --pause--> Paused
//!                    ^                  |
//!                    +-----resume-------+
//! any --stop--> GameOver
//! ```
//!
//! Invalid transitions return false and change nothing.
//!
//! # Tick
//!
//! Each tick computes `dt = now - last_frame` in seconds, then (if a player
//! and world are bound) runs gravity → integration → ground collision →
//! obstacle check, and only then publishes a [`GameSnapshot`].

use std::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::config::SimConfig;
use crate::entities::{GameWorld, Obstacle, Player};
use crate::physics::PhysicsEngine;
use crate::rotation::WorldRotator;
use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use crate::snapshot::GameSnapshot;
use crate::types::{
    AirActionKind, GameState, GroundMode, ObstacleKind, Orientation, RotationDirection,
    TouchIntent,
};

/// Something the host may want to react to (sound, flash, HUD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    ObstacleHit { id: u32, kind: ObstacleKind, hp: u32 },
    RotationComplete(Orientation),
    GameOver,
}

const MAX_EVENTS: usize = 16;

pub struct GameLoop<S: FrameScheduler = FrameQueue> {
    state: GameState,
    physics: PhysicsEngine,
    rotator: WorldRotator,
    scheduler: S,
    player: Option<Player>,
    world: Option<GameWorld>,
    obstacles: Vec<Obstacle>,
    /// Obstacle currently overlapping the player (damage is applied once per contact)
    contact: Option<u32>,
    tick_frame: Option<FrameHandle>,
    last_frame_ms: u64,
    delta_time: f32,
    frame_count: u64,
    events: ArrayVec<SimEvent, MAX_EVENTS>,
    on_snapshot: Option<Box<dyn FnMut(&GameSnapshot)>>,
}

impl GameLoop<FrameQueue> {
    pub fn new(config: SimConfig) -> Self {
        Self::with_scheduler(config, FrameQueue::new())
    }
}

impl Default for GameLoop<FrameQueue> {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl<S: FrameScheduler> GameLoop<S> {
    pub fn with_scheduler(config: SimConfig, scheduler: S) -> Self {
        Self {
            state: GameState::Menu,
            physics: PhysicsEngine::new(config),
            rotator: WorldRotator::new(config.rotation_duration_ms),
            scheduler,
            player: None,
            world: None,
            obstacles: Vec::new(),
            contact: None,
            tick_frame: None,
            last_frame_ms: 0,
            delta_time: 0.0,
            frame_count: 0,
            events: ArrayVec::new(),
            on_snapshot: None,
        }
    }

    pub fn config(&self) -> &SimConfig {
        self.physics.config()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn world(&self) -> Option<&GameWorld> {
        self.world.as_ref()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Mutable obstacle list for the external spawner.
    pub fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn rotator(&self) -> &WorldRotator {
        &self.rotator
    }

    /// `dt` (seconds) used by the most recent tick.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frame the tick loop is waiting on, if any.
    pub fn pending_tick(&self) -> Option<FrameHandle> {
        self.tick_frame
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    pub fn set_world(&mut self, world: GameWorld) {
        self.world = Some(world);
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
        self.contact = None;
    }

    /// Render callback, invoked after every simulated tick.
    pub fn set_on_snapshot(&mut self, callback: Box<dyn FnMut(&GameSnapshot)>) {
        self.on_snapshot = Some(callback);
    }

    pub fn on_rotation_complete(&mut self, callback: Box<dyn FnMut(&GameWorld)>) {
        self.rotator.on_rotation_complete(callback);
    }

    pub fn take_events(&mut self) -> ArrayVec<SimEvent, MAX_EVENTS> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// `Menu → Playing`. Anchors the frame clock at `now_ms`.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state != GameState::Menu {
            debug!(state = self.state.as_str(), "start ignored");
            return false;
        }
        self.state = GameState::Playing;
        self.last_frame_ms = now_ms;
        self.schedule_tick();
        debug!(now_ms, "game started");
        true
    }

    /// `Playing → Paused`. The pending tick is cancelled before returning.
    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            debug!(state = self.state.as_str(), "pause ignored");
            return false;
        }
        self.state = GameState::Paused;
        self.cancel_tick();
        debug!("game paused");
        true
    }

    /// `Paused → Playing`. Re-anchors the clock so paused time is not simulated.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.state != GameState::Paused {
            debug!(state = self.state.as_str(), "resume ignored");
            return false;
        }
        self.state = GameState::Playing;
        self.last_frame_ms = now_ms;
        self.schedule_tick();
        debug!(now_ms, "game resumed");
        true
    }

    /// Any state → `GameOver`. The pending tick is cancelled before returning.
    pub fn stop(&mut self) {
        self.cancel_tick();
        if self.state != GameState::GameOver {
            self.state = GameState::GameOver;
            let _ = self.events.try_push(SimEvent::GameOver);
            debug!("game over");
        }
    }

    // ---------------------------------------------------------------------
    // Frames
    // ---------------------------------------------------------------------

    /// Deliver a frame the host was asked for.
    ///
    /// Routes the handle to the tick loop or the rotation animator. Unknown or
    /// cancelled handles are ignored and return false.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: u64) -> bool {
        if self.tick_frame == Some(handle) {
            self.tick_frame = None;
            self.tick(now_ms);
            return true;
        }

        if self.rotator.pending_frame() == Some(handle) {
            if let Some(world) = self.world.as_mut() {
                let was_rotating = self.rotator.is_rotating();
                self.rotator.on_frame(handle, world, now_ms, &mut self.scheduler);
                if was_rotating && !self.rotator.is_rotating() {
                    let _ = self.events.try_push(SimEvent::RotationComplete(world.rotation));
                }
            }
            return true;
        }

        trace!(?handle, "stale frame ignored");
        false
    }

    /// One loop iteration at wall time `now_ms`.
    fn tick(&mut self, now_ms: u64) {
        if self.state != GameState::Playing {
            return;
        }

        let dt = now_ms.saturating_sub(self.last_frame_ms) as f32 / 1000.0;
        self.last_frame_ms = now_ms;
        self.update(dt);

        if self.state == GameState::Playing {
            self.schedule_tick();
        }
    }

    /// The tick body with an explicit `dt` in seconds.
    ///
    /// Silently does nothing to the simulation if no player or world is bound.
    pub fn update(&mut self, dt: f32) {
        self.delta_time = dt;

        let (Some(player), Some(world)) = (self.player.as_mut(), self.world.as_ref()) else {
            trace!("update skipped: player or world not bound");
            return;
        };

        self.physics.step(player, world, dt);

        let hit = self
            .physics
            .check_obstacle_collision(player, &self.obstacles)
            .copied();
        let mut died = false;
        match hit {
            Some(obstacle) if self.contact != Some(obstacle.id) => {
                self.contact = Some(obstacle.id);
                died = player.apply_damage(obstacle.kind.damage());
                let _ = self.events.try_push(SimEvent::ObstacleHit {
                    id: obstacle.id,
                    kind: obstacle.kind,
                    hp: player.hp,
                });
                debug!(
                    id = obstacle.id,
                    kind = obstacle.kind.as_str(),
                    hp = player.hp,
                    "obstacle hit"
                );
            }
            Some(_) => {}
            None => self.contact = None,
        }

        self.frame_count += 1;
        if died {
            self.stop();
        }
        self.publish();
    }

    // ---------------------------------------------------------------------
    // Player actions
    // ---------------------------------------------------------------------

    /// Dispatch a classified gesture.
    ///
    /// `DoubleJump` means a mid-air jump or a gravity switch depending on the
    /// configured [`AirActionKind`]. Ignored unless playing.
    pub fn apply_intent(&mut self, intent: TouchIntent) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        match intent {
            TouchIntent::Jump => self.jump(),
            TouchIntent::DoubleJump => match self.config().air_action {
                AirActionKind::DoubleJump => self.double_jump(),
                AirActionKind::GravitySwitch => self.gravity_switch(),
            },
        }
    }

    pub fn jump(&mut self) -> bool {
        match (self.player.as_mut(), self.world.as_ref()) {
            (Some(player), Some(world)) => self.physics.jump(player, world),
            _ => false,
        }
    }

    pub fn double_jump(&mut self) -> bool {
        match (self.player.as_mut(), self.world.as_ref()) {
            (Some(player), Some(world)) => self.physics.double_jump(player, world),
            _ => false,
        }
    }

    pub fn gravity_switch(&mut self) -> bool {
        match (self.player.as_mut(), self.world.as_mut()) {
            (Some(player), Some(world)) => self.physics.gravity_switch(player, world),
            _ => false,
        }
    }

    /// Start a world rotation. Gravity changes immediately.
    ///
    /// Only the four-wall world rotates; on the center line gravity must stay
    /// vertical and matched to `is_on_top`, so this returns false there.
    pub fn rotate_world(&mut self, direction: RotationDirection, now_ms: u64) -> bool {
        if self.config().ground_mode != GroundMode::Walls {
            debug!("rotation ignored: center-line world");
            return false;
        }
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        self.rotator
            .rotate_world(world, direction, now_ms, &mut self.scheduler)
    }

    /// Record the section the run has reached and trigger its scripted rotation.
    ///
    /// The section is recorded in either ground mode. Returns whether a
    /// rotation started.
    pub fn enter_section(&mut self, section: u32, now_ms: u64) -> bool {
        let walls = self.config().ground_mode == GroundMode::Walls;
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        world.current_section = section;
        if !walls {
            return false;
        }
        self.rotator
            .trigger_rotation_at_section(world, section, now_ms, &mut self.scheduler)
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.state = self.state;
        out.player = self.player;
        out.world = self.world;
        out.rotating = self.rotator.is_rotating();
        out.frame = self.frame_count;
        out.dt = self.delta_time;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn publish(&mut self) {
        if self.on_snapshot.is_none() {
            return;
        }
        let snap = self.snapshot();
        if let Some(callback) = self.on_snapshot.as_mut() {
            callback(&snap);
        }
    }

    fn schedule_tick(&mut self) {
        if self.tick_frame.is_none() {
            self.tick_frame = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: FrameScheduler> fmt::Debug for GameLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLoop")
            .field("state", &self.state)
            .field("player", &self.player)
            .field("world", &self.world)
            .field("obstacles", &self.obstacles.len())
            .field("rotator", &self.rotator)
            .field("tick_frame", &self.tick_frame)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}
