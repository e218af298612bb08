//! Protocol version model
//!
//! A protocol is stored as a chain of immutable versions sharing a group id.
//! Edits never mutate a version in place: they append a new snapshot and move
//! the "current" pointer. Version numbers start at 1 and strictly increase
//! within a group; exactly one version per group is current at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProtocolGroupId;

/// One immutable snapshot of a protocol's content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolVersion {
    /// Stable identifier shared by every version of this protocol
    pub group_id: ProtocolGroupId,

    /// Version number, 1-based and strictly increasing within the group
    pub version: u32,

    /// Protocol title
    pub title: String,

    /// Protocol body (markdown)
    pub content: String,

    /// Actor who created this version
    pub created_by: String,

    /// When this version was created
    pub created_at: DateTime<Utc>,

    /// Whether this version is the group's current (authoritative) snapshot.
    /// Not necessarily the highest number: a restore appends a new highest
    /// version carrying an older version's payload.
    pub is_current: bool,
}

impl ProtocolVersion {
    /// Create version 1 of a brand new protocol group
    pub fn first(
        group_id: ProtocolGroupId,
        title: impl Into<String>,
        content: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            group_id,
            version: 1,
            title: title.into(),
            content: content.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            is_current: true,
        }
    }

    /// Create the follow-up snapshot to `highest`, numbered `highest + 1`
    pub fn successor(
        group_id: ProtocolGroupId,
        highest: u32,
        title: impl Into<String>,
        content: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            group_id,
            version: highest + 1,
            title: title.into(),
            content: content.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            is_current: true,
        }
    }

    /// A short identifier for display and audit descriptions, e.g. "pro-...#3"
    pub fn label(&self) -> String {
        format!("{}#{}", self.group_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_version() {
        let group_id = ProtocolGroupId::new();
        let v = ProtocolVersion::first(group_id, "PCR Setup", "Mix reagents.", "alice");

        assert_eq!(v.version, 1);
        assert!(v.is_current);
        assert_eq!(v.created_by, "alice");
    }

    #[test]
    fn test_successor_increments_highest() {
        let group_id = ProtocolGroupId::new();
        let v = ProtocolVersion::successor(group_id, 4, "PCR Setup", "Updated.", "bob");

        assert_eq!(v.version, 5);
        assert!(v.is_current);
    }

    #[test]
    fn test_label_contains_version() {
        let group_id = ProtocolGroupId::new();
        let v = ProtocolVersion::first(group_id, "Staining", "...", "alice");
        assert!(v.label().ends_with("#1"));
    }

    #[test]
    fn test_serde_round_trip() {
        let v = ProtocolVersion::first(ProtocolGroupId::new(), "T", "C", "alice");
        let json = serde_json::to_string(&v).unwrap();
        let back: ProtocolVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, 1);
        assert_eq!(back.title, "T");
        assert!(back.is_current);
    }
}
