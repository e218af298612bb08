//! Entry service: the lockable record controller
//!
//! Wraps the entry state machine with persistence and audit emission. Every
//! successful mutation produces exactly one audit event; a rejected mutation
//! (locked entry, bad input) produces none and leaves the stored record
//! byte-identical. Sign and unlock emit Lock and Unlock events rather than
//! generic updates so the custody chain is reconstructible from the log
//! alone.

use serde_json::json;

use crate::audit::{describe_changes, AuditAction, AuditDraft, AuditSink, EntityKind};
use crate::error::{LabbookError, LabbookResult};
use crate::models::{Entry, EntryId, LinkedReagent, ReagentId};
use crate::storage::Storage;

/// How to undo a staged entry mutation if its audit event cannot land
enum Unwind {
    /// Put the pre-mutation snapshot back
    Restore(Box<Entry>),
    /// Drop a freshly created entry
    Remove(EntryId),
}

/// Service for lockable entries
pub struct EntryService<'a> {
    storage: &'a Storage,
    audit: &'a dyn AuditSink,
}

impl<'a> EntryService<'a> {
    /// Create a new entry service
    pub fn new(storage: &'a Storage, audit: &'a dyn AuditSink) -> Self {
        Self { storage, audit }
    }

    /// Create a new draft entry
    pub fn create(&self, title: &str, content: &str, actor: &str) -> LabbookResult<Entry> {
        let title = title.trim();
        let actor = actor.trim();
        if title.is_empty() {
            return Err(LabbookError::Validation(
                "Entry title cannot be empty".into(),
            ));
        }
        if actor.is_empty() {
            return Err(LabbookError::Validation(
                "Actor identity cannot be empty".into(),
            ));
        }

        let entry = Entry::new(title, content);

        let slot = self.storage.entries.entry_lock(entry.id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            entry.id.to_string(),
            AuditAction::Create,
            actor,
            format!("Entry '{}' created", entry.title),
        );
        self.commit(Unwind::Remove(entry.id), draft)?;

        Ok(entry)
    }

    /// Edit a draft entry's title and/or content
    ///
    /// Fails fast with a lock violation if the entry is signed; the stored
    /// record is untouched and no audit event is emitted.
    pub fn edit(
        &self,
        id: EntryId,
        title: Option<String>,
        content: Option<String>,
        actor: &str,
    ) -> LabbookResult<Entry> {
        let actor = require_actor(actor)?;

        let slot = self.storage.entries.entry_lock(id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let before = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))?;

        let mut entry = before.clone();
        entry.apply_edit(title, content)?;

        let changes = describe_changes(
            &json!({ "title": before.title, "content": before.content }),
            &json!({ "title": entry.title, "content": entry.content }),
        )
        .unwrap_or_else(|| "no field changes".to_string());

        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            id.to_string(),
            AuditAction::Update,
            actor,
            changes,
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(entry)
    }

    /// Sign an entry, transitioning it Draft -> Locked
    ///
    /// Requires explicit confirmation. Signing an already-locked entry fails
    /// without a second Lock event.
    pub fn sign(&self, id: EntryId, actor: &str, confirm: bool) -> LabbookResult<Entry> {
        let slot = self.storage.entries.entry_lock(id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let before = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))?;

        let mut entry = before.clone();
        entry.sign(actor, confirm)?;

        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            id.to_string(),
            AuditAction::Lock,
            actor.trim(),
            format!("Entry '{}' signed and locked", entry.title),
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(entry)
    }

    /// Unlock a signed entry, transitioning it Locked -> Draft
    ///
    /// The prior signature is cleared from the entry, but the Lock event that
    /// recorded it stays in the audit trail forever.
    pub fn unlock(&self, id: EntryId, actor: &str) -> LabbookResult<Entry> {
        let slot = self.storage.entries.entry_lock(id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let before = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))?;

        let mut entry = before.clone();
        entry.unlock(actor)?;

        let signer = before.signed_by.clone().unwrap_or_default();
        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            id.to_string(),
            AuditAction::Unlock,
            actor.trim(),
            format!("Entry unlocked; signature by '{}' cleared", signer),
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(entry)
    }

    /// Link a reagent to a draft entry
    pub fn link_reagent(
        &self,
        id: EntryId,
        reagent_id: ReagentId,
        quantity_used: Option<f64>,
        unit: &str,
        notes: &str,
        actor: &str,
    ) -> LabbookResult<Entry> {
        let actor = require_actor(actor)?;

        let slot = self.storage.entries.entry_lock(id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let before = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))?;
        before.ensure_editable()?;

        if !self.storage.reagents.exists(reagent_id)? {
            return Err(LabbookError::reagent_not_found(reagent_id.to_string()));
        }
        if before.find_link(reagent_id).is_some() {
            return Err(LabbookError::Duplicate {
                entity_type: "Reagent link",
                identifier: reagent_id.to_string(),
            });
        }

        let mut entry = before.clone();
        let mut link = LinkedReagent::new(reagent_id);
        link.quantity_used = quantity_used;
        link.unit = unit.trim().to_string();
        link.notes = notes.trim().to_string();
        entry.linked_reagents.push(link);
        entry.updated_at = chrono::Utc::now();

        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            id.to_string(),
            AuditAction::Update,
            actor,
            format!("Linked reagent {}", reagent_id),
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(entry)
    }

    /// Remove a reagent link from a draft entry
    pub fn unlink_reagent(
        &self,
        id: EntryId,
        reagent_id: ReagentId,
        actor: &str,
    ) -> LabbookResult<Entry> {
        let actor = require_actor(actor)?;

        let slot = self.storage.entries.entry_lock(id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let before = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))?;
        before.ensure_editable()?;

        let position = before.find_link(reagent_id).ok_or(LabbookError::NotFound {
            entity_type: "Linked reagent",
            identifier: reagent_id.to_string(),
        })?;

        let mut entry = before.clone();
        entry.linked_reagents.remove(position);
        entry.updated_at = chrono::Utc::now();

        self.storage.entries.upsert(entry.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Entry,
            id.to_string(),
            AuditAction::Update,
            actor,
            format!("Unlinked reagent {}", reagent_id),
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(entry)
    }

    /// Get an entry by id
    pub fn get(&self, id: EntryId) -> LabbookResult<Entry> {
        self.storage
            .entries
            .get(id)?
            .ok_or_else(|| LabbookError::entry_not_found(id.to_string()))
    }

    /// List all entries, most recently updated first
    pub fn list(&self) -> LabbookResult<Vec<Entry>> {
        self.storage.entries.get_all()
    }

    /// Persist a staged mutation, then record its audit event
    ///
    /// Mirrors the protocol service: the entry change and its event are one
    /// durability unit, unwound together on failure.
    fn commit(&self, unwind: Unwind, draft: AuditDraft) -> LabbookResult<()> {
        if let Err(err) = self.storage.entries.save() {
            self.apply_unwind(&unwind)?;
            return Err(err);
        }

        if let Err(err) = self.audit.record(draft) {
            // Best-effort unwind; the audit failure is the error the
            // caller must see even if the rollback write also fails
            let rollback = self
                .apply_unwind(&unwind)
                .and_then(|_| self.storage.entries.save());
            if let Err(rollback_err) = rollback {
                eprintln!(
                    "warning: could not unwind staged entry change: {}",
                    rollback_err
                );
            }
            return Err(err);
        }

        Ok(())
    }

    fn apply_unwind(&self, unwind: &Unwind) -> LabbookResult<()> {
        match unwind {
            Unwind::Restore(before) => self.storage.entries.upsert((**before).clone()),
            Unwind::Remove(id) => self.storage.entries.remove(*id),
        }
    }
}

fn require_actor(actor: &str) -> LabbookResult<&str> {
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(LabbookError::Validation(
            "Actor identity cannot be empty".into(),
        ));
    }
    Ok(actor)
}
