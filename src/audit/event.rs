//! Audit event data structures
//!
//! Defines the immutable audit record, the enumerations of auditable entity
//! kinds and actions, and the query filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a recorded audit event
///
/// Ids are a monotonic sequence assigned by the sink, so (timestamp, id)
/// totally orders the log.
pub type EventId = u64;

/// Kinds of entities that can appear in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Experiment,
    Entry,
    Protocol,
    Reagent,
    Sample,
    Equipment,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Project => write!(f, "Project"),
            EntityKind::Experiment => write!(f, "Experiment"),
            EntityKind::Entry => write!(f, "Entry"),
            EntityKind::Protocol => write!(f, "Protocol"),
            EntityKind::Reagent => write!(f, "Reagent"),
            EntityKind::Sample => write!(f, "Sample"),
            EntityKind::Equipment => write!(f, "Equipment"),
        }
    }
}

impl EntityKind {
    /// Parse a kind from user input (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Some(Self::Project),
            "experiment" => Some(Self::Experiment),
            "entry" => Some(Self::Entry),
            "protocol" => Some(Self::Protocol),
            "reagent" => Some(Self::Reagent),
            "sample" => Some(Self::Sample),
            "equipment" => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// State-changing actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
    /// Entry was signed and locked
    Lock,
    /// Entry was unlocked back to draft
    Unlock,
    /// A prior protocol version's content was restored as a new version
    Restore,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Lock => write!(f, "LOCK"),
            AuditAction::Unlock => write!(f, "UNLOCK"),
            AuditAction::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single immutable audit record
///
/// Once recorded, an event is never mutated or deleted. The sink assigns the
/// id and timestamp; timestamps are monotonically non-decreasing within a
/// process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Monotonic event id assigned by the sink
    pub id: EventId,

    /// Kind of entity affected
    pub entity_kind: EntityKind,

    /// ID of the affected entity
    pub entity_id: String,

    /// Action performed
    pub action: AuditAction,

    /// Who performed the action (opaque identity string)
    pub actor: String,

    /// When the action occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Human-readable description of what changed
    pub description: String,
}

impl AuditEvent {
    /// Format the event for human-readable output
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] #{} {} {} {} by {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.action,
            self.entity_kind,
            self.entity_id,
            self.actor,
            self.description
        )
    }
}

/// An audit event before the sink has stamped it
///
/// Services build drafts; the sink assigns the id and timestamp when the
/// event is durably recorded.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub action: AuditAction,
    pub actor: String,
    pub description: String,
}

impl AuditDraft {
    /// Create a new draft event
    pub fn new(
        entity_kind: EntityKind,
        entity_id: impl Into<String>,
        action: AuditAction,
        actor: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            entity_kind,
            entity_id: entity_id.into(),
            action,
            actor: actor.into(),
            description: description.into(),
        }
    }
}

/// Filter for querying the audit log
///
/// Empty filter matches everything. Results are always oldest-first.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_kind: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub actor: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Filter matching every event
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one entity kind
    pub fn entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    /// Restrict to one entity id
    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Restrict to one actor
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Restrict to events at or after this instant
    pub fn since(mut self, t: DateTime<Utc>) -> Self {
        self.since = Some(t);
        self
    }

    /// Restrict to events at or before this instant
    pub fn until(mut self, t: DateTime<Utc>) -> Self {
        self.until = Some(t);
        self
    }

    /// Check whether an event passes this filter
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(kind) = self.entity_kind {
            if event.entity_kind != kind {
                return false;
            }
        }
        if let Some(id) = &self.entity_id {
            if &event.entity_id != id {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if &event.actor != actor {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if event.timestamp > until {
                return false;
            }
        }
        true
    }
}
