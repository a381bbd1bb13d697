//! Configuration module for aegis
//!
//! This module provides configuration management including:
//! - config directory resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::AegisPaths;
pub use settings::Settings;
