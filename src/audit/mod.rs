//! Append-only audit logging
//!
//! Records every state-changing operation across all entity kinds in an
//! append-only log for compliance review.
//!
//! # Architecture
//!
//! - [`AuditEvent`] / [`AuditDraft`]: the immutable record and its unstamped
//!   precursor. The sink assigns the monotonic id and a non-decreasing
//!   timestamp when the event is durably recorded.
//! - [`AuditSink`]: the injected port both the version chain store and the
//!   lockable record controller write through. The trait exposes `record`
//!   and `query` only; nothing can update or delete a recorded event.
//! - [`FileAuditLog`]: the production sink, a line-delimited JSON (JSONL)
//!   file appended and synced per event.
//! - [`MemoryAuditSink`]: in-memory sink for tests.
//! - [`describe_changes`]: builds the "which fields changed" text carried by
//!   Update events.
//!
//! # Example
//!
//! ```rust,ignore
//! use labbook::audit::{AuditDraft, AuditAction, AuditFilter, AuditSink, EntityKind, FileAuditLog};
//!
//! let log = FileAuditLog::open(audit_log_path)?;
//! let id = log.record(AuditDraft::new(
//!     EntityKind::Entry,
//!     entry.id.to_string(),
//!     AuditAction::Lock,
//!     "alice",
//!     "Entry signed and locked",
//! ))?;
//!
//! let history = log.query(&AuditFilter::all().entity_id(entry.id.to_string()))?;
//! ```

mod diff;
mod event;
mod logger;
mod sink;

pub use diff::describe_changes;
pub use event::{AuditAction, AuditDraft, AuditEvent, AuditFilter, EntityKind, EventId};
pub use logger::FileAuditLog;
pub use sink::{AuditSink, MemoryAuditSink};

#[cfg(test)]
pub use sink::FailingAuditSink;
