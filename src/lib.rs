//! labbook - Terminal-based laboratory record keeper
//!
//! This library provides the core functionality for labbook, an electronic
//! laboratory notebook for the terminal. Its center of gravity is a
//! versioned, audited, lockable record store: every protocol edit appends an
//! immutable version, every state change lands in an append-only audit log,
//! and a signed entry becomes immutable until explicitly unlocked.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (protocol versions, entries, registries)
//! - `storage`: JSON file storage layer with per-entity locking
//! - `audit`: Append-only audit logging
//! - `services`: Business logic (version chains, lock state machine)
//! - `display`: Terminal output formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use labbook::config::paths::LabbookPaths;
//! use labbook::storage::Storage;
//!
//! let paths = LabbookPaths::new()?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::LabbookError;
