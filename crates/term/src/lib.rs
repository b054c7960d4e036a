//! Terminal rendering for the runner.
//!
//! A small, game-oriented rendering layer: no widget toolkit, just a
//! framebuffer of styled cells that [`GameView`] draws a snapshot into and
//! [`TerminalRenderer`] flushes with per-run diffing.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use flip_runner_core as core;
pub use flip_runner_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
