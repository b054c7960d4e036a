//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and provides the tap classifier
//! that turns raw touch starts into single- and double-tap intents.

pub mod classifier;
pub mod map;

pub use flip_runner_types as types;

pub use classifier::TouchClassifier;
pub use map::{handle_key_event, should_quit};
