use serde::Serialize;

use crate::entities::{GameWorld, Player};
use crate::types::GameState;

/// Read-only view published to the render boundary once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub state: GameState,
    pub player: Option<Player>,
    pub world: Option<GameWorld>,
    pub rotating: bool,
    /// Ticks simulated so far
    pub frame: u64,
    /// Delta time of the last tick, in seconds
    pub dt: f32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.state.is_playing()
    }
}
