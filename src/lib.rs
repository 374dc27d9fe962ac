//! Lava Runner: a tile-based platformer simulation.
//!
//! `domain` holds the geometry and the actors, `sim` the level state and
//! frame driver, `ui` the terminal front-end used by the binary.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
pub mod ui;
