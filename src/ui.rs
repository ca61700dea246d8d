//! HUD and overlay text
//!
//! Pure view models built from the session. The DOM layer copies these into
//! elements; nothing here touches the page.

use crate::sim::{GamePhase, Metrics};

/// Title shown on the start screen
pub const TITLE: &str = "NEON BOUNCE";

/// Zero-pad a score to four digits
pub fn pad_score(value: u64) -> String {
    format!("{:04}", value)
}

/// Heads-up display shown while a run is on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: String,
    pub best: String,
    /// `None` unless at least two consecutive paddle hits
    pub combo: Option<String>,
    pub paused: bool,
}

impl Hud {
    pub fn new(metrics: &Metrics, phase: GamePhase) -> Self {
        Self {
            score: pad_score(metrics.score),
            best: pad_score(metrics.high_score),
            combo: (metrics.combo > 1).then(|| format!("x{} COMBO", metrics.combo)),
            paused: phase == GamePhase::Paused,
        }
    }

    /// Text for the pause button
    pub fn pause_label(&self) -> &'static str {
        if self.paused { "RESUME" } else { "PAUSE" }
    }
}

/// Footer status line
pub fn status_line(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Paused => "System Status: Halted",
        GamePhase::Start | GamePhase::Playing | GamePhase::GameOver => {
            "System Status: Operational"
        }
    }
}

/// Game-over summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub max_combo: u32,
    pub high_score: u64,
    pub new_high_score: bool,
}

impl From<Metrics> for GameOverSummary {
    fn from(metrics: Metrics) -> Self {
        Self {
            score: metrics.score,
            max_combo: metrics.max_combo,
            high_score: metrics.high_score,
            new_high_score: metrics.is_new_high_score(),
        }
    }
}

/// Which full-screen overlay is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Title,
    Hidden,
    Paused,
    GameOver,
}

impl Overlay {
    /// HUD is only up while a run is on screen
    pub fn shows_hud(self) -> bool {
        matches!(self, Overlay::Hidden | Overlay::Paused)
    }
}

impl From<GamePhase> for Overlay {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Start => Overlay::Title,
            GamePhase::Playing => Overlay::Hidden,
            GamePhase::Paused => Overlay::Paused,
            GamePhase::GameOver => Overlay::GameOver,
        }
    }
}
