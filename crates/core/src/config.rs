//! Simulation tuning, built from the defaults in `flip_runner_types`.

use serde::Serialize;

use crate::types::{
    AirActionKind, GroundMode, DOUBLE_JUMP_FORCE, GRAVITY_STRENGTH, JUMP_FORCE, PLAYER_SIZE,
    ROTATION_DURATION_MS, WORLD_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    pub gravity_strength: f32,
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub player_size: f32,
    pub world_size: f32,
    pub rotation_duration_ms: u64,
    pub air_action: AirActionKind,
    pub ground_mode: GroundMode,
}

impl SimConfig {
    pub fn new() -> Self {
        Self {
            gravity_strength: GRAVITY_STRENGTH,
            jump_force: JUMP_FORCE,
            double_jump_force: DOUBLE_JUMP_FORCE,
            player_size: PLAYER_SIZE,
            world_size: WORLD_SIZE,
            rotation_duration_ms: ROTATION_DURATION_MS,
            air_action: AirActionKind::default(),
            ground_mode: GroundMode::default(),
        }
    }

    pub fn with_air_action(mut self, air_action: AirActionKind) -> Self {
        self.air_action = air_action;
        self
    }

    pub fn with_ground_mode(mut self, ground_mode: GroundMode) -> Self {
        self.ground_mode = ground_mode;
        self
    }

    pub fn with_gravity_strength(mut self, gravity_strength: f32) -> Self {
        self.gravity_strength = gravity_strength;
        self
    }

    pub fn with_jump_force(mut self, jump_force: f32) -> Self {
        self.jump_force = jump_force;
        self
    }

    pub fn with_double_jump_force(mut self, double_jump_force: f32) -> Self {
        self.double_jump_force = double_jump_force;
        self
    }

    pub fn with_player_size(mut self, player_size: f32) -> Self {
        self.player_size = player_size;
        self
    }

    pub fn with_world_size(mut self, world_size: f32) -> Self {
        self.world_size = world_size;
        self
    }

    /// A zero duration is bumped to 1ms so progress stays well defined.
    pub fn with_rotation_duration_ms(mut self, rotation_duration_ms: u64) -> Self {
        self.rotation_duration_ms = rotation_duration_ms.max(1);
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
