//! Core simulation for the gravity-flip runner - pure, deterministic, and testable
//!
//! This crate contains the physics rules, world rotation, and game lifecycle.
//! It has **no dependencies** on terminals, windows, or wall clocks: every
//! timed operation takes an explicit `now_ms`, and the display refresh loop is
//! abstracted behind [`FrameScheduler`].
//!
//! # Module Structure
//!
//! - [`math`]: vector helpers, easing, and axis-aligned boxes
//! - [`entities`]: player, world, obstacle records and the gravity table
//! - [`config`]: tuning constants bundled into [`SimConfig`]
//! - [`physics`]: gravity integration, jumps, gravity switch, collisions
//! - [`rotation`]: quarter-turn world rotation with eased display angle
//! - [`scheduler`]: frame request/cancel capability and an in-memory queue
//! - [`game_loop`]: lifecycle state machine and per-tick update
//! - [`snapshot`]: read-only view for renderers
//!
//! # Rules
//!
//! - **Center line**: the player runs on top of or underneath a horizontal line
//!   and a gravity switch flips it across, teleporting to the other face.
//! - **Walls**: gravity follows the world orientation and the player lands on
//!   the near or far wall along the gravity axis.
//! - **Double jump**: one extra mid-air jump per airborne phase, only after a
//!   normal jump.
//! - **Rotation**: gravity changes the moment a rotation starts; the visual
//!   angle catches up over `rotation_duration_ms`.
//!
//! # Example
//!
//! ```
//! use flip_runner_core::{GameLoop, GameWorld, Player, SimConfig};
//! use flip_runner_core::types::{GameState, TouchIntent};
//!
//! let mut game = GameLoop::new(SimConfig::default());
//! game.set_player(Player::new());
//! game.set_world(GameWorld::new());
//! assert!(game.start(0));
//!
//! assert!(game.apply_intent(TouchIntent::Jump));
//! for handle in game.scheduler_mut().take_ready() {
//!     game.on_frame(handle, 16);
//! }
//!
//! assert_eq!(game.state(), GameState::Playing);
//! assert!(game.player().unwrap().is_airborne());
//! ```

pub mod config;
pub mod entities;
pub mod game_loop;
pub mod math;
pub mod physics;
pub mod rotation;
pub mod scheduler;
pub mod snapshot;

pub use flip_runner_types as types;

// Re-export commonly used types for convenience
pub use config::SimConfig;
pub use entities::{gravity_for, GameWorld, Obstacle, Player};
pub use game_loop::{GameLoop, SimEvent};
pub use math::{Aabb, Vec3};
pub use physics::PhysicsEngine;
pub use rotation::{section_direction, WorldRotator};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler, MAX_PENDING_FRAMES};
pub use snapshot::GameSnapshot;
