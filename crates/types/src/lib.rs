//! Shared types and tuning constants for the gravity-flip runner.
//!
//! Everything here is plain data with no behavior beyond small conversions, so
//! it can be used by the simulation core, the input layer, and any host that
//! draws the game.
//!
//! # Coordinate System
//!
//! The default center-line mode uses screen coordinates: `+y` points down and
//! the player's `position` is the top-left corner of its sprite. Gravity
//! `(0, 1, 0)` therefore pulls the player down onto the top of the center line,
//! and `(0, -1, 0)` pulls it up against the underside.
//!
//! # Physics Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_STRENGTH` | 800 | Acceleration in px/s² |
//! | `JUMP_FORCE` | 300 | Jump impulse in px/s |
//! | `DOUBLE_JUMP_FORCE` | 300 | Mid-air impulse in px/s |
//! | `PLAYER_SIZE` | 32 | Player sprite edge in px |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Host frame interval (~60 FPS) |
//! | `DOUBLE_TAP_WINDOW_MS` | 300 | Max gap between taps of a double tap |
//! | `ROTATION_DURATION_MS` | 1000 | Length of a world rotation animation |
//!
//! # Examples
//!
//! ```
//! use flip_runner_types::{AirActionKind, Orientation, RotationDirection};
//!
//! let orientation = Orientation::Deg270.rotated(RotationDirection::Clockwise);
//! assert_eq!(orientation, Orientation::Deg0);
//!
//! assert_eq!(
//!     AirActionKind::from_str("gravitySwitch"),
//!     Some(AirActionKind::GravitySwitch)
//! );
//! ```

use serde::Serialize;

/// Logical screen width in pixels (landscape)
pub const SCREEN_WIDTH: f32 = 800.0;

/// Logical screen height in pixels (landscape)
pub const SCREEN_HEIGHT: f32 = 400.0;

/// Default y of the center gravity line (middle of the screen)
pub const CENTER_LINE_Y: f32 = SCREEN_HEIGHT / 2.0;

/// Distance to the far wall in four-wall mode
pub const WORLD_SIZE: f32 = 400.0;

/// Gravity acceleration in px/s²
pub const GRAVITY_STRENGTH: f32 = 800.0;

/// Jump impulse in px/s
pub const JUMP_FORCE: f32 = 300.0;

/// Double jump impulse in px/s
pub const DOUBLE_JUMP_FORCE: f32 = 300.0;

/// Player sprite size in px (square)
pub const PLAYER_SIZE: f32 = 32.0;

/// Fixed x of the player on screen
pub const PLAYER_START_X: f32 = 100.0;

/// Starting and maximum hit points
pub const MAX_HP: u32 = 100;

/// Host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u64 = 16;

/// Two taps closer than this are a double tap
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Duration of one 90° world rotation
pub const ROTATION_DURATION_MS: u64 = 1000;

/// Rotation rhythm applied per section index (repeats by modulo)
pub const SECTION_ROTATION_PATTERN: [RotationDirection; 4] = [
    RotationDirection::Clockwise,
    RotationDirection::Clockwise,
    RotationDirection::CounterClockwise,
    RotationDirection::Clockwise,
];


/// Lifecycle of a session.
///
/// `Menu → Playing ⇄ Paused`, and any state → `GameOver` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn is_playing(&self) -> bool {
        matches!(self, GameState::Playing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "gameOver",
        }
    }
}

/// What a double tap does while airborne.
///
/// - **DoubleJump**: a second impulse opposite gravity, once per airtime
/// - **GravitySwitch**: flip to the other side of the center line (grounded only);
///   the mid-air double jump is disabled in this mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AirActionKind {
    DoubleJump,
    #[default]
    GravitySwitch,
}

impl AirActionKind {
    /// Parse from string (case-insensitive, `-`/`_` ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use flip_runner_types::AirActionKind;
    ///
    /// assert_eq!(AirActionKind::from_str("double-jump"), Some(AirActionKind::DoubleJump));
    /// assert_eq!(AirActionKind::from_str("GRAVITY_SWITCH"), Some(AirActionKind::GravitySwitch));
    /// assert_eq!(AirActionKind::from_str("fly"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "doublejump" => Some(AirActionKind::DoubleJump),
            "gravityswitch" => Some(AirActionKind::GravitySwitch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AirActionKind::DoubleJump => "doubleJump",
            AirActionKind::GravitySwitch => "gravitySwitch",
        }
    }
}

/// Which surfaces the player can land on.
///
/// - **CenterLine**: the single horizontal line at `center_line_y`, from either side
/// - **Walls**: the four walls of a `WORLD_SIZE` box; the one gravity points at is the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroundMode {
    #[default]
    CenterLine,
    Walls,
}

impl GroundMode {
    /// Parse from string (case-insensitive, `-`/`_` ignored)
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "centerline" | "line" => Some(GroundMode::CenterLine),
            "walls" | "wall" => Some(GroundMode::Walls),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroundMode::CenterLine => "centerLine",
            GroundMode::Walls => "walls",
        }
    }
}

/// Direction of a 90° world rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Signed angle in degrees (`+90` clockwise, `-90` counter-clockwise)
    pub fn signed_degrees(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 90,
            RotationDirection::CounterClockwise => -90,
        }
    }
}

/// World orientation, one of the four quarter turns.
///
/// The cycle goes: 0° → 90° → 180° → 270° → 0° (clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u16")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub fn degrees(&self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Map degrees (any multiple of 90, wrapped mod 360) to an orientation
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Orientation::Deg0),
            90 => Some(Orientation::Deg90),
            180 => Some(Orientation::Deg180),
            270 => Some(Orientation::Deg270),
            _ => None,
        }
    }

    /// Number of clockwise quarter turns from 0°
    pub fn quarter_turns(&self) -> u8 {
        (self.degrees() / 90) as u8
    }

    /// `(current ± 90) mod 360`
    ///
    /// # Examples
    ///
    /// ```
    /// use flip_runner_types::Orientation;
    /// use flip_runner_types::RotationDirection::{Clockwise, CounterClockwise};
    ///
    /// assert_eq!(Orientation::Deg0.rotated(Clockwise), Orientation::Deg90);
    /// assert_eq!(Orientation::Deg0.rotated(CounterClockwise), Orientation::Deg270);
    /// ```
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => match self {
                Orientation::Deg0 => Orientation::Deg90,
                Orientation::Deg90 => Orientation::Deg180,
                Orientation::Deg180 => Orientation::Deg270,
                Orientation::Deg270 => Orientation::Deg0,
            },
            RotationDirection::CounterClockwise => match self {
                Orientation::Deg0 => Orientation::Deg270,
                Orientation::Deg270 => Orientation::Deg180,
                Orientation::Deg180 => Orientation::Deg90,
                Orientation::Deg90 => Orientation::Deg0,
            },
        }
    }
}

impl From<Orientation> for u16 {
    fn from(o: Orientation) -> u16 {
        o.degrees()
    }
}

/// Obstacle variants placed by the spawner.
///
/// Damage per contact:
/// - **Spike**: 25
/// - **Block**: 10
/// - **Saw**: 40
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
    Spike,
    Block,
    Saw,
}

impl ObstacleKind {
    pub fn damage(&self) -> u32 {
        match self {
            ObstacleKind::Spike => 25,
            ObstacleKind::Block => 10,
            ObstacleKind::Saw => 40,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Block => "block",
            ObstacleKind::Saw => "saw",
        }
    }
}

/// Gesture recognized by the tap classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchIntent {
    /// A lone tap, reported once the double-tap window has passed
    Jump,
    /// Second tap inside the window, reported immediately
    DoubleJump,
}

/// Host-level actions mapped from keys or buttons.
///
/// `TouchStart`/`TouchEnd` go through the tap classifier; everything else is
/// applied to the game loop directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Raw touch down (feeds the classifier)
    TouchStart,
    /// Raw touch up (feeds the classifier)
    TouchEnd,
    /// Dedicated gravity switch button
    GravitySwitch,
    /// Rotate the world 90° clockwise
    RotateCw,
    /// Rotate the world 90° counter-clockwise
    RotateCcw,
    /// Leave the menu and start playing
    Start,
    /// Toggle between playing and paused
    Pause,
    /// Throw away the session and build a new one
    Restart,
}

impl GameAction {
    /// Parse action from string (camelCase names, case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use flip_runner_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("touchStart"), Some(GameAction::TouchStart));
    /// assert_eq!(GameAction::from_str("gravityswitch"), Some(GameAction::GravitySwitch));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "touchstart" => Some(GameAction::TouchStart),
            "touchend" => Some(GameAction::TouchEnd),
            "gravityswitch" => Some(GameAction::GravitySwitch),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "start" => Some(GameAction::Start),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::TouchStart => "touchStart",
            GameAction::TouchEnd => "touchEnd",
            GameAction::GravitySwitch => "gravitySwitch",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Start => "start",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
