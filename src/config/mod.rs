//! Configuration module for labbook
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LabbookPaths;
pub use settings::Settings;
