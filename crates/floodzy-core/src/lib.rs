//! Core types and utilities for Floodzy
//!
//! # Modules
//!
//! - `config`: Environment loading and process settings
//! - `error`: Error types and Result alias
//! - `types`: Conversation, tool and location types shared by every crate

pub mod config;
pub mod error;
pub mod types;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use types::*;
