//! Audit sink interface
//!
//! The audit trail is an injected dependency: services receive an
//! [`AuditSink`] rather than reaching for shared global state, so tests can
//! substitute an in-memory sink and assert on its exact contents.
//!
//! The trait deliberately has no update or delete operation; append-only is
//! enforced at the interface, not by convention.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::event::{AuditDraft, AuditEvent, AuditFilter, EventId};
use crate::error::{LabbookError, LabbookResult};

/// Port for recording and querying audit events
pub trait AuditSink: Send + Sync {
    /// Durably record one event, returning its assigned id
    ///
    /// Fails only on a storage fault; the caller must then fail the mutation
    /// the event describes (the two form one durability unit).
    fn record(&self, draft: AuditDraft) -> LabbookResult<EventId>;

    /// Query recorded events, oldest first
    fn query(&self, filter: &AuditFilter) -> LabbookResult<Vec<AuditEvent>>;
}

/// Stamp a draft with the next id and a non-decreasing timestamp
///
/// Shared by sink implementations: wall clocks can step backwards, but audit
/// order must not, so the timestamp is clamped to the previous one.
pub(crate) fn stamp(draft: AuditDraft, id: EventId, last: DateTime<Utc>) -> AuditEvent {
    let now = Utc::now();
    let timestamp = if now < last { last } else { now };
    AuditEvent {
        id,
        entity_kind: draft.entity_kind,
        entity_id: draft.entity_id,
        action: draft.action,
        actor: draft.actor,
        timestamp,
        description: draft.description,
    }
}

/// In-memory audit sink for tests
#[derive(Default)]
pub struct MemoryAuditSink {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    events: Vec<AuditEvent>,
    next_id: EventId,
}

impl MemoryAuditSink {
    /// Create an empty in-memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.inner.lock().expect("audit sink poisoned").events.len()
    }

    /// Whether the sink holds no events
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, draft: AuditDraft) -> LabbookResult<EventId> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Audit sink poisoned: {}", e)))?;

        inner.next_id += 1;
        let id = inner.next_id;
        let last = inner
            .events
            .last()
            .map(|e| e.timestamp)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        inner.events.push(stamp(draft, id, last));
        Ok(id)
    }

    fn query(&self, filter: &AuditFilter) -> LabbookResult<Vec<AuditEvent>> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Audit sink poisoned: {}", e)))?;

        Ok(inner
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}

/// Audit sink that fails every record call
///
/// Used in tests to verify that a failed audit append unwinds the mutation
/// it describes.
#[cfg(test)]
pub struct FailingAuditSink;

#[cfg(test)]
impl AuditSink for FailingAuditSink {
    fn record(&self, _draft: AuditDraft) -> LabbookResult<EventId> {
        Err(LabbookError::Storage("audit log unavailable".into()))
    }

    fn query(&self, _filter: &AuditFilter) -> LabbookResult<Vec<AuditEvent>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::event::{AuditAction, EntityKind};

    fn draft(entity_id: &str, action: AuditAction) -> AuditDraft {
        AuditDraft::new(EntityKind::Entry, entity_id, action, "alice", "test")
    }

    #[test]
    fn test_record_assigns_sequential_ids() {
        let sink = MemoryAuditSink::new();
        let a = sink.record(draft("ent-1", AuditAction::Create)).unwrap();
        let b = sink.record(draft("ent-1", AuditAction::Update)).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_query_returns_oldest_first() {
        let sink = MemoryAuditSink::new();
        sink.record(draft("ent-1", AuditAction::Create)).unwrap();
        sink.record(draft("ent-1", AuditAction::Lock)).unwrap();
        sink.record(draft("ent-1", AuditAction::Unlock)).unwrap();

        let events = sink.query(&AuditFilter::all()).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].id < w[1].id));
        assert!(events
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_query_filters_by_entity() {
        let sink = MemoryAuditSink::new();
        sink.record(draft("ent-1", AuditAction::Create)).unwrap();
        sink.record(draft("ent-2", AuditAction::Create)).unwrap();

        let events = sink
            .query(&AuditFilter::all().entity_id("ent-2"))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity_id, "ent-2");
    }

    #[test]
    fn test_failing_sink_reports_storage_fault() {
        let sink = FailingAuditSink;
        let err = sink.record(draft("ent-1", AuditAction::Create)).unwrap_err();
        assert!(err.is_durability_fault());
    }
}
