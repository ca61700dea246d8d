//! Game state and core simulation types
//!
//! Everything the physics step reads or writes lives in [`GameState`].

use glam::Vec2;

use crate::colors;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Frozen gameplay, still rendered
    Paused,
    /// Ball fell past the floor
    GameOver,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic only
    pub color: u32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT / 3.0),
            vel: Vec2::splat(INITIAL_BALL_SPEED),
            radius: BALL_RADIUS,
            color: colors::BALL,
        }
    }
}

/// The player's paddle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Cosmetic only
    pub color: u32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (GAME_WIDTH - INITIAL_PADDLE_WIDTH) / 2.0,
            y: GAME_HEIGHT - PADDLE_BOTTOM_OFFSET,
            width: INITIAL_PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            color: colors::PADDLE,
        }
    }
}

impl Paddle {
    /// Horizontal center
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Largest legal `x` for the current width
    pub fn max_x(&self) -> f32 {
        GAME_WIDTH - self.width
    }

    /// Pull `x` back inside the playfield
    pub fn clamp_to_playfield(&mut self) {
        self.x = self.x.min(self.max_x()).max(0.0);
    }

    /// Center the paddle on a logical x coordinate. Not clamped.
    pub fn center_on(&mut self, x: f32) {
        self.x = x - self.width / 2.0;
    }

    /// Narrow the paddle by one difficulty step. Returns true if it changed.
    pub fn shrink(&mut self) -> bool {
        let old = self.width;
        self.width = (self.width - PADDLE_SHRINK_STEP).max(MIN_PADDLE_WIDTH);
        self.width != old
    }
}

/// Score and combo counters
///
/// `Copy` so snapshots handed to the presentation layer never alias the live
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub score: u64,
    pub high_score: u64,
    /// Consecutive paddle hits since the last side-wall hit
    pub combo: u32,
    /// Best combo this session
    pub max_combo: u32,
    /// Reserved, always 1
    pub level: u32,
}

impl Metrics {
    /// Fresh session counters, carrying over the stored best
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            combo: 0,
            max_combo: 0,
            level: 1,
        }
    }

    /// True when this run set the stored best
    pub fn is_new_high_score(&self) -> bool {
        self.score > 0 && self.score == self.high_score
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Which boundary the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Ceiling,
}

/// Discrete things that happened during one tick
///
/// The simulation never performs I/O itself; the session maps these to audio,
/// persistence and HUD updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off a side wall or the ceiling
    WallHit(Wall),
    /// Ball bounced off the paddle
    PaddleHit {
        /// Hit offset from the paddle center, roughly -1..1
        offset: f32,
    },
    /// Score or combo changed
    MetricsChanged(Metrics),
    /// A new best score that must be stored
    HighScore(u64),
    /// Difficulty scaling narrowed the paddle
    PaddleShrunk { width: f32 },
    /// Ball left through the floor; carries the final counters
    GameOver(Metrics),
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    pub metrics: Metrics,
    /// Simulation tick counter for the current session
    pub time_ticks: u64,
}

impl GameState {
    /// Title-screen state with the stored best score
    pub fn new(high_score: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            ball: Ball::default(),
            paddle: Paddle::default(),
            metrics: Metrics::new(high_score),
            time_ticks: 0,
        }
    }

    /// Put ball, paddle and counters back to their starting values and enter
    /// `Playing`. The best score survives.
    pub fn reset_for_play(&mut self) {
        self.ball = Ball::default();
        self.paddle = Paddle::default();
        self.metrics = Metrics::new(self.metrics.high_score);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
    }
}
