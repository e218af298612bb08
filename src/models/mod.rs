//! Core data models for labbook
//!
//! This module contains the data structures of the record store: protocol
//! version chains, lockable entries, and the registry records (projects,
//! experiments, reagents) whose lifecycle feeds the audit trail.

pub mod diff;
pub mod entry;
pub mod ids;
pub mod project;
pub mod protocol;
pub mod reagent;

pub use diff::{diff_lines, DiffLine, DiffOp, VersionDiff};
pub use entry::{Entry, EntryStatus, LinkedReagent};
pub use ids::{EntryId, ExperimentId, ProjectId, ProtocolGroupId, ReagentId};
pub use project::{Experiment, Project};
pub use protocol::ProtocolVersion;
pub use reagent::Reagent;
