//! Business logic services for labbook
//!
//! Services sit between the CLI and storage. Each holds a borrow of the
//! shared [`Storage`](crate::storage::Storage) and an
//! [`AuditSink`](crate::audit::AuditSink), and owns one rule everywhere: a
//! mutation and its audit event succeed or fail together.

pub mod entry;
pub mod project;
pub mod protocol;
pub mod reagent;

pub use entry::EntryService;
pub use project::ProjectService;
pub use protocol::ProtocolService;
pub use reagent::ReagentService;
