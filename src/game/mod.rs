//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front-end in [`crate::modes`] drives it, but any event loop can.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickOutcome};
pub use state::{GamePhase, GameSnapshot, Position, Snake};
