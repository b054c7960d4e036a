//! Flip runner (workspace facade crate).
//!
//! Re-exports the member crates as `flip_runner::{core,input,term,types}` and
//! holds the host-side pieces shared by the binary: logging, environment
//! settings, the [`session::Session`] glue, and the headless runner.

pub use flip_runner_core as core;
pub use flip_runner_input as input;
pub use flip_runner_term as term;
pub use flip_runner_types as types;

pub mod headless;
pub mod logging;
pub mod session;
pub mod settings;
