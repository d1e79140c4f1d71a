//! Torus Snake - single-player Snake on a wrapping grid
//!
//! This library provides:
//! - The game engine: tick-driven movement, collisions, food and scoring (game module)
//! - High score storage behind a small trait (persistence module)
//! - A terminal front-end built on ratatui and crossterm (input, render, modes)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
