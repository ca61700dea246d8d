//! Neon Bounce - a gravity bounce arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring)
//! - `session`: Game phase transitions and per-frame event dispatch
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `highscores`: Persisted best score
//! - `settings`: User preferences
//! - `audio`: Procedural sound cues
//! - `ui`: HUD and overlay text

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
///
/// All positions and speeds are in logical pixels and pixels per tick.
pub mod consts {
    /// Logical playfield size (rendering is scaled to fit)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const INITIAL_BALL_SPEED: f32 = 5.0;
    /// Vertical speed cap applied after a paddle bounce
    pub const MAX_BALL_SPEED: f32 = 12.0;
    /// Added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.15;

    /// Paddle defaults
    pub const INITIAL_PADDLE_WIDTH: f32 = 120.0;
    pub const MIN_PADDLE_WIDTH: f32 = 60.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    /// Distance from the paddle's top edge to the floor
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Keyboard movement per tick
    pub const PADDLE_SPEED_STEP: f32 = 10.0;
    /// Configured but not part of the movement model
    pub const PADDLE_FRICTION: f32 = 0.9;

    /// Horizontal speed at the very edge of the paddle
    pub const BOUNCE_HORIZONTAL_SPEED: f32 = 8.0;
    /// Vertical speed multiplier on every paddle bounce
    pub const PADDLE_BOUNCE_BOOST: f32 = 1.05;

    /// Difficulty scaling: paddle narrows by this much...
    pub const PADDLE_SHRINK_STEP: f32 = 2.0;
    /// ...whenever the score lands on a multiple of this
    pub const SHRINK_EVERY_POINTS: u64 = 10;
}

/// Cosmetic palette (sRGB hex)
pub mod colors {
    pub const BALL: u32 = 0x22d3ee;
    pub const PADDLE: u32 = 0xf472b6;
    pub const BACKGROUND: u32 = 0x0f172a;
    pub const GRID: u32 = 0x1e293b;
}

/// Split a packed `0xRRGGBB` color into normalized sRGB components
#[inline]
pub fn unpack_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
