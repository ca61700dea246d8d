//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per call, no delta time
//! - No randomness
//! - No rendering, audio or platform dependencies; effects leave as events

pub mod collision;
pub mod state;
pub mod tick;

#[cfg(test)]
mod invariants;

pub use collision::{PaddleContact, ball_below_floor, ball_paddle_collision};
pub use state::{Ball, GameEvent, GamePhase, GameState, Metrics, Paddle, Wall};
pub use tick::{TickInput, tick};
