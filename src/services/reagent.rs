//! Reagent service
//!
//! Manages the inventory registry that entries link against. Deleting a
//! reagent is refused while any entry still references it, so reagent ids in
//! stored records never dangle.

use serde_json::json;

use crate::audit::{describe_changes, AuditAction, AuditDraft, AuditSink, EntityKind};
use crate::error::{LabbookError, LabbookResult};
use crate::models::{Reagent, ReagentId};
use crate::storage::Storage;

/// Service for the reagent inventory
pub struct ReagentService<'a> {
    storage: &'a Storage,
    audit: &'a dyn AuditSink,
}

impl<'a> ReagentService<'a> {
    /// Create a new reagent service
    pub fn new(storage: &'a Storage, audit: &'a dyn AuditSink) -> Self {
        Self { storage, audit }
    }

    /// Register a new reagent
    pub fn create(
        &self,
        name: &str,
        catalog_number: &str,
        supplier: &str,
        actor: &str,
    ) -> LabbookResult<Reagent> {
        let name = name.trim();
        let actor = require_actor(actor)?;
        if name.is_empty() {
            return Err(LabbookError::Validation(
                "Reagent name cannot be empty".into(),
            ));
        }

        let mut reagent = Reagent::new(name);
        reagent.catalog_number = catalog_number.trim().to_string();
        reagent.supplier = supplier.trim().to_string();

        self.storage.reagents.upsert(reagent.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Reagent,
            reagent.id.to_string(),
            AuditAction::Create,
            actor,
            format!("Reagent '{}' registered", reagent.name),
        );
        self.commit(Unwind::Remove(reagent.id), draft)?;

        Ok(reagent)
    }

    /// Update a reagent's registry fields
    pub fn update(
        &self,
        id: ReagentId,
        name: Option<String>,
        catalog_number: Option<String>,
        supplier: Option<String>,
        actor: &str,
    ) -> LabbookResult<Reagent> {
        let actor = require_actor(actor)?;

        let before = self
            .storage
            .reagents
            .get(id)?
            .ok_or_else(|| LabbookError::reagent_not_found(id.to_string()))?;

        let mut reagent = before.clone();
        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(LabbookError::Validation(
                    "Reagent name cannot be empty".into(),
                ));
            }
            reagent.name = name;
        }
        if let Some(catalog_number) = catalog_number {
            reagent.catalog_number = catalog_number.trim().to_string();
        }
        if let Some(supplier) = supplier {
            reagent.supplier = supplier.trim().to_string();
        }
        reagent.updated_at = chrono::Utc::now();

        let changes = describe_changes(
            &json!({
                "name": before.name,
                "catalog_number": before.catalog_number,
                "supplier": before.supplier,
            }),
            &json!({
                "name": reagent.name,
                "catalog_number": reagent.catalog_number,
                "supplier": reagent.supplier,
            }),
        )
        .unwrap_or_else(|| "no field changes".to_string());

        self.storage.reagents.upsert(reagent.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Reagent,
            id.to_string(),
            AuditAction::Update,
            actor,
            changes,
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(reagent)
    }

    /// Delete a reagent, refused while any entry still links it
    pub fn delete(&self, id: ReagentId, actor: &str) -> LabbookResult<()> {
        let actor = require_actor(actor)?;

        let before = self
            .storage
            .reagents
            .get(id)?
            .ok_or_else(|| LabbookError::reagent_not_found(id.to_string()))?;

        if self.storage.entries.any_links_reagent(id)? {
            return Err(LabbookError::Validation(format!(
                "Reagent '{}' is linked by one or more entries and cannot be deleted",
                before.name
            )));
        }

        self.storage.reagents.remove(id)?;
        let draft = AuditDraft::new(
            EntityKind::Reagent,
            id.to_string(),
            AuditAction::Delete,
            actor,
            format!("Reagent '{}' deleted", before.name),
        );
        self.commit(Unwind::Restore(Box::new(before)), draft)?;

        Ok(())
    }

    /// Get a reagent by id
    pub fn get(&self, id: ReagentId) -> LabbookResult<Reagent> {
        self.storage
            .reagents
            .get(id)?
            .ok_or_else(|| LabbookError::reagent_not_found(id.to_string()))
    }

    /// List all reagents, sorted by name
    pub fn list(&self) -> LabbookResult<Vec<Reagent>> {
        self.storage.reagents.get_all()
    }

    fn commit(&self, unwind: Unwind, draft: AuditDraft) -> LabbookResult<()> {
        if let Err(err) = self.storage.reagents.save() {
            self.apply_unwind(&unwind)?;
            return Err(err);
        }

        if let Err(err) = self.audit.record(draft) {
            // Best-effort unwind; the audit failure is the error the
            // caller must see even if the rollback write also fails
            let rollback = self
                .apply_unwind(&unwind)
                .and_then(|_| self.storage.reagents.save());
            if let Err(rollback_err) = rollback {
                eprintln!(
                    "warning: could not unwind staged reagent change: {}",
                    rollback_err
                );
            }
            return Err(err);
        }

        Ok(())
    }

    fn apply_unwind(&self, unwind: &Unwind) -> LabbookResult<()> {
        match unwind {
            Unwind::Restore(before) => self.storage.reagents.upsert((**before).clone()),
            Unwind::Remove(id) => self.storage.reagents.remove(*id),
        }
    }
}

enum Unwind {
    Restore(Box<Reagent>),
    Remove(ReagentId),
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
