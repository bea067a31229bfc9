//! Rules engine for single-player Snake.
//!
//! [`game::GameEngine`] owns the board and advances it one tick at a time;
//! rendering, input capture and score storage live outside this crate and
//! talk to it through plain values and the [`score::ScoreSink`] trait.

pub mod config;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod input;
pub mod item;
pub mod score;
pub mod script;
pub mod snake;
pub mod tile;
