//! # Agri Common Library
//!
//! Shared code for the farming advisory crates:
//! - Error taxonomy (`Error`, `Result`)
//! - TOML configuration loading and atomic writes
//! - Screen navigation state and last-screen persistence

pub mod config;
pub mod error;
pub mod screen;

pub use error::{Error, Result};
pub use screen::{Screen, ScreenStore};
