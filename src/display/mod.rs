//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and detail views.

pub mod audit;
pub mod entry;
pub mod project;
pub mod protocol;
pub mod reagent;

pub use audit::{format_audit_trail, format_audit_trail_json};
pub use entry::{format_entry_details, format_entry_list};
pub use project::{format_project_details, format_project_list};
pub use protocol::{format_diff, format_protocol_details, format_protocol_list, format_version_history};
pub use reagent::format_reagent_list;
