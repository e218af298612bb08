//! Entry model and lock state machine
//!
//! An entry is a record with a two-state lifecycle: Draft (editable) and
//! Locked (signed, immutable). Transitions are expressed as methods returning
//! a result so that illegal moves are a typed surface, not a flag checked ad
//! hoc at call sites. While an entry is Locked, its content, title, and
//! linked-reagent associations cannot change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntryId, ReagentId};
use crate::error::{LabbookError, LabbookResult};

/// Lock status of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is editable
    #[default]
    Draft,
    /// Entry has been signed and is immutable
    Locked,
}

impl EntryStatus {
    /// Check if this entry is locked (mutations must be rejected)
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Locked => write!(f, "Locked"),
        }
    }
}

/// A reagent association on an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedReagent {
    /// The reagent being referenced
    pub reagent_id: ReagentId,

    /// Quantity consumed, if recorded
    pub quantity_used: Option<f64>,

    /// Unit for the quantity (mg, mL, ...)
    #[serde(default)]
    pub unit: String,

    /// Free-text usage notes
    #[serde(default)]
    pub notes: String,

    /// When the link was made
    pub linked_at: DateTime<Utc>,
}

impl LinkedReagent {
    /// Create a new reagent link
    pub fn new(reagent_id: ReagentId) -> Self {
        Self {
            reagent_id,
            quantity_used: None,
            unit: String::new(),
            notes: String::new(),
            linked_at: Utc::now(),
        }
    }
}

/// A lab record that can be signed into immutability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier
    pub id: EntryId,

    /// Entry title
    pub title: String,

    /// Entry body (markdown)
    #[serde(default)]
    pub content: String,

    /// Lock status
    #[serde(default)]
    pub status: EntryStatus,

    /// Actor who signed the entry (set while Locked)
    pub signed_by: Option<String>,

    /// When the entry was signed (set while Locked)
    pub signed_at: Option<DateTime<Utc>>,

    /// Reagents referenced by this entry
    #[serde(default)]
    pub linked_reagents: Vec<LinkedReagent>,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last modified
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a new draft entry
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            title: title.into(),
            content: content.into(),
            status: EntryStatus::Draft,
            signed_by: None,
            signed_at: None,
            linked_reagents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reject the mutation if this entry is locked
    ///
    /// Called before any content or reagent-link change; a locked entry must
    /// be left byte-identical by a failed attempt.
    pub fn ensure_editable(&self) -> LabbookResult<()> {
        if self.status.is_locked() {
            Err(LabbookError::Locked(self.id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Transition Draft -> Locked
    ///
    /// Requires a non-empty actor and explicit confirmation. Signing an
    /// already-locked entry fails without touching state so repeated UI
    /// submissions cannot produce duplicate Lock events.
    pub fn sign(&mut self, actor: &str, confirm: bool) -> LabbookResult<()> {
        if actor.trim().is_empty() {
            return Err(LabbookError::Validation(
                "Signing requires a non-empty actor identity".into(),
            ));
        }
        if !confirm {
            return Err(LabbookError::Validation(
                "Signing requires explicit confirmation".into(),
            ));
        }
        if self.status.is_locked() {
            return Err(LabbookError::AlreadyLocked(self.id.to_string()));
        }

        self.status = EntryStatus::Locked;
        self.signed_by = Some(actor.trim().to_string());
        self.signed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition Locked -> Draft
    ///
    /// Privileged but gated only by a non-empty actor string; there is no
    /// credential check because authentication is outside this system. The
    /// prior Lock audit event is never erased by unlocking.
    pub fn unlock(&mut self, actor: &str) -> LabbookResult<()> {
        if actor.trim().is_empty() {
            return Err(LabbookError::Validation(
                "Unlocking requires a non-empty actor identity".into(),
            ));
        }
        if !self.status.is_locked() {
            return Err(LabbookError::NotLocked(self.id.to_string()));
        }

        self.status = EntryStatus::Draft;
        self.signed_by = None;
        self.signed_at = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply a content/title change to a draft entry
    pub fn apply_edit(
        &mut self,
        title: Option<String>,
        content: Option<String>,
    ) -> LabbookResult<()> {
        self.ensure_editable()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Find the position of a reagent link, if present
    pub fn find_link(&self, reagent_id: ReagentId) -> Option<usize> {
        self.linked_reagents
            .iter()
            .position(|l| l.reagent_id == reagent_id)
    }
}
