//! Protocol service: the version chain store
//!
//! Every edit of a protocol appends an immutable version; nothing is ever
//! mutated in place or deleted, so any audit reference to a version number
//! stays valid indefinitely. Restore is a forward append of an older
//! version's payload, never a rewind: version numbers are never reused or
//! decremented.
//!
//! Each mutation holds the group's entity lock across version-number
//! allocation, persistence, and audit emission, and is atomic: if the audit
//! event cannot be recorded, the staged append is unwound before the lock is
//! released.

use serde_json::json;

use crate::audit::{describe_changes, AuditAction, AuditDraft, AuditSink, EntityKind};
use crate::error::{LabbookError, LabbookResult};
use crate::models::{diff_lines, ProtocolGroupId, ProtocolVersion, VersionDiff};
use crate::storage::Storage;

/// Service for protocol version chains
pub struct ProtocolService<'a> {
    storage: &'a Storage,
    audit: &'a dyn AuditSink,
}

impl<'a> ProtocolService<'a> {
    /// Create a new protocol service
    pub fn new(storage: &'a Storage, audit: &'a dyn AuditSink) -> Self {
        Self { storage, audit }
    }

    /// Create a new protocol group with its initial version
    pub fn create(
        &self,
        title: &str,
        content: &str,
        actor: &str,
    ) -> LabbookResult<ProtocolVersion> {
        let (title, content, actor) = validate_payload(title, content, actor)?;

        let group_id = ProtocolGroupId::new();
        let version = ProtocolVersion::first(group_id, title, content, actor);

        let slot = self.storage.protocols.group_lock(group_id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        self.storage.protocols.append_version(version.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Protocol,
            group_id.to_string(),
            AuditAction::Create,
            &version.created_by,
            format!("Protocol '{}' created (version 1)", version.title),
        );
        self.commit(group_id, None, draft)?;

        Ok(version)
    }

    /// Append a new version with the given payload and make it current
    ///
    /// The new number is highest-issued + 1 regardless of which version is
    /// current; prior versions stay untouched and retrievable.
    pub fn commit_edit(
        &self,
        group_id: ProtocolGroupId,
        title: &str,
        content: &str,
        actor: &str,
    ) -> LabbookResult<ProtocolVersion> {
        let (title, content, actor) = validate_payload(title, content, actor)?;

        let slot = self.storage.protocols.group_lock(group_id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let snapshot = self
            .storage
            .protocols
            .get_group(group_id)?
            .ok_or_else(|| LabbookError::protocol_not_found(group_id.to_string()))?;
        let highest = snapshot.iter().map(|v| v.version).max().unwrap_or(0);
        let previous = snapshot.iter().find(|v| v.is_current).cloned();

        let version = ProtocolVersion::successor(group_id, highest, title, content, actor);

        let changes = previous
            .and_then(|prev| {
                describe_changes(
                    &json!({ "title": prev.title, "content": prev.content }),
                    &json!({ "title": version.title, "content": version.content }),
                )
            })
            .unwrap_or_else(|| "no field changes".to_string());

        self.storage.protocols.append_version(version.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Protocol,
            group_id.to_string(),
            AuditAction::Update,
            &version.created_by,
            format!("Committed version {}: {}", version.version, changes),
        );
        self.commit(group_id, Some(snapshot), draft)?;

        Ok(version)
    }

    /// Restore a prior version's payload as a new current version
    ///
    /// Behaves exactly like `commit_edit` with the target version's title
    /// and content: always a forward append, never a rewind.
    pub fn restore(
        &self,
        group_id: ProtocolGroupId,
        target_version: u32,
        actor: &str,
    ) -> LabbookResult<ProtocolVersion> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(LabbookError::Validation(
                "Actor identity cannot be empty".into(),
            ));
        }

        let slot = self.storage.protocols.group_lock(group_id)?;
        let _guard = slot
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock poisoned: {}", e)))?;

        let snapshot = self
            .storage
            .protocols
            .get_group(group_id)?
            .ok_or_else(|| LabbookError::protocol_not_found(group_id.to_string()))?;
        let target = snapshot
            .iter()
            .find(|v| v.version == target_version)
            .cloned()
            .ok_or_else(|| {
                LabbookError::version_not_found(format!("{}#{}", group_id, target_version))
            })?;
        let highest = snapshot.iter().map(|v| v.version).max().unwrap_or(0);

        let version = ProtocolVersion::successor(
            group_id,
            highest,
            target.title.clone(),
            target.content.clone(),
            actor,
        );

        self.storage.protocols.append_version(version.clone())?;
        let draft = AuditDraft::new(
            EntityKind::Protocol,
            group_id.to_string(),
            AuditAction::Restore,
            actor,
            format!(
                "Restored version {} as version {}",
                target_version, version.version
            ),
        );
        self.commit(group_id, Some(snapshot), draft)?;

        Ok(version)
    }

    /// List all versions of a group, ascending by version number
    pub fn list_versions(
        &self,
        group_id: ProtocolGroupId,
    ) -> LabbookResult<Vec<ProtocolVersion>> {
        self.storage
            .protocols
            .get_group(group_id)?
            .ok_or_else(|| LabbookError::protocol_not_found(group_id.to_string()))
    }

    /// Get one version of a group
    pub fn get_version(
        &self,
        group_id: ProtocolGroupId,
        version: u32,
    ) -> LabbookResult<ProtocolVersion> {
        self.storage
            .protocols
            .get_version(group_id, version)?
            .ok_or_else(|| LabbookError::version_not_found(format!("{}#{}", group_id, version)))
    }

    /// Get the current snapshot of a group
    pub fn current(&self, group_id: ProtocolGroupId) -> LabbookResult<ProtocolVersion> {
        self.storage
            .protocols
            .current_version(group_id)?
            .ok_or_else(|| LabbookError::protocol_not_found(group_id.to_string()))
    }

    /// Get the current version of every protocol group
    pub fn list(&self) -> LabbookResult<Vec<ProtocolVersion>> {
        self.storage.protocols.current_of_all_groups()
    }

    /// Compare the stored content of two versions, line by line
    pub fn diff(
        &self,
        group_id: ProtocolGroupId,
        from_version: u32,
        to_version: u32,
    ) -> LabbookResult<VersionDiff> {
        let from = self.get_version(group_id, from_version)?;
        let to = self.get_version(group_id, to_version)?;

        Ok(diff_lines(
            group_id,
            from.version,
            &from.content,
            to.version,
            &to.content,
        ))
    }

    /// Persist a staged append, then record its audit event
    ///
    /// The data change and its audit event are one durability unit: if
    /// either write fails, the group chain is restored to `snapshot`
    /// (None means the group did not exist) and the error propagates.
    fn commit(
        &self,
        group_id: ProtocolGroupId,
        snapshot: Option<Vec<ProtocolVersion>>,
        draft: AuditDraft,
    ) -> LabbookResult<()> {
        if let Err(err) = self.storage.protocols.save() {
            // Atomic write failed, file is untouched; drop the staged append
            self.storage.protocols.replace_group(group_id, snapshot)?;
            return Err(err);
        }

        if let Err(err) = self.audit.record(draft) {
            // Best-effort unwind; the audit failure is the error the
            // caller must see even if the rollback write also fails
            let rollback = self
                .storage
                .protocols
                .replace_group(group_id, snapshot)
                .and_then(|_| self.storage.protocols.save());
            if let Err(rollback_err) = rollback {
                eprintln!(
                    "warning: could not unwind staged protocol change: {}",
                    rollback_err
                );
            }
            return Err(err);
        }

        Ok(())
    }
}

fn validate_payload<'p>(
    title: &'p str,
    content: &'p str,
    actor: &'p str,
) -> LabbookResult<(&'p str, &'p str, &'p str)> {
    let title = title.trim();
    let content = content.trim_end();
    let actor = actor.trim();

    if title.is_empty() {
        return Err(LabbookError::Validation(
            "Protocol title cannot be empty".into(),
        ));
    }
    if content.is_empty() {
        return Err(LabbookError::Validation(
            "Protocol content cannot be empty".into(),
        ));
    }
    if actor.is_empty() {
        return Err(LabbookError::Validation(
            "Actor identity cannot be empty".into(),
        ));
    }
    Ok((title, content, actor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditFilter, FailingAuditSink, MemoryAuditSink};
    use crate::config::paths::LabbookPaths;
    use tempfile::TempDir;

    fn test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LabbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_starts_at_version_one() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service.create("PCR Setup", "A", "alice").unwrap();

        assert_eq!(v1.version, 1);
        assert!(v1.is_current);
        assert_eq!(audit.len(), 1);

        let events = audit.query(&AuditFilter::all()).unwrap();
        assert_eq!(events[0].action, AuditAction::Create);
        assert_eq!(events[0].entity_id, v1.group_id.to_string());
    }

    #[test]
    fn test_create_validates_inputs() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        assert!(service.create("", "content", "alice").is_err());
        assert!(service.create("Title", "", "alice").is_err());
        assert!(service.create("Title", "content", " ").is_err());
        // Failed calls produce no audit events
        assert!(audit.is_empty());
    }

    #[test]
    fn test_commit_edit_appends_and_moves_current() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service.create("PCR Setup", "A", "alice").unwrap();
        let v2 = service
            .commit_edit(v1.group_id, "PCR Setup", "B", "bob")
            .unwrap();

        assert_eq!(v2.version, 2);
        assert!(v2.is_current);

        // Version 1 still retrievable with original content
        let old = service.get_version(v1.group_id, 1).unwrap();
        assert_eq!(old.content, "A");
        assert!(!old.is_current);

        let events = audit.query(&AuditFilter::all()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, AuditAction::Update);
        assert!(events[1].description.contains("version 2"));
    }

    #[test]
    fn test_commit_edit_with_multibyte_content() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        // Long non-ASCII content must survive change-summary truncation
        let before = "é".repeat(40);
        let v1 = service.create("Incubation", &before, "alice").unwrap();
        let v2 = service
            .commit_edit(v1.group_id, "Incubation", "37°C for 30 min in 5 µL", "bob")
            .unwrap();

        assert_eq!(v2.version, 2);
        let events = audit.query(&AuditFilter::all()).unwrap();
        assert!(events[1].description.contains("content"));
    }

    #[test]
    fn test_commit_edit_unknown_group() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let err = service
            .commit_edit(ProtocolGroupId::new(), "T", "C", "alice")
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(audit.is_empty());
    }

    #[test]
    fn test_restore_appends_never_rewinds() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service.create("PCR Setup", "A", "alice").unwrap();
        service
            .commit_edit(v1.group_id, "PCR Setup", "B", "alice")
            .unwrap();
        let v3 = service.restore(v1.group_id, 1, "alice").unwrap();

        assert_eq!(v3.version, 3);
        assert_eq!(v3.content, "A");
        assert!(v3.is_current);

        // Full chain: [1:"A", 2:"B", 3:"A"], one current
        let versions = service.list_versions(v1.group_id).unwrap();
        let contents: Vec<_> = versions.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(contents, vec!["A", "B", "A"]);
        assert_eq!(
            versions.iter().map(|v| v.version).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(versions.iter().filter(|v| v.is_current).count(), 1);

        let events = audit.query(&AuditFilter::all()).unwrap();
        assert_eq!(events[2].action, AuditAction::Restore);
        assert!(events[2].description.contains("version 1"));
    }

    #[test]
    fn test_restore_missing_target() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service.create("PCR Setup", "A", "alice").unwrap();
        let err = service.restore(v1.group_id, 9, "alice").unwrap_err();

        assert!(err.is_not_found());
        // Chain untouched, only the Create event exists
        assert_eq!(service.list_versions(v1.group_id).unwrap().len(), 1);
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn test_version_numbers_contiguous_after_many_edits() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service.create("PCR Setup", "v0", "alice").unwrap();
        for i in 0..4 {
            service
                .commit_edit(v1.group_id, "PCR Setup", &format!("rev {}", i), "alice")
                .unwrap();
        }
        service.restore(v1.group_id, 2, "alice").unwrap();

        let versions = service.list_versions(v1.group_id).unwrap();
        assert_eq!(versions.len(), 6);
        assert_eq!(
            versions.iter().map(|v| v.version).collect::<Vec<_>>(),
            (1..=6).collect::<Vec<u32>>()
        );
        assert_eq!(versions.iter().filter(|v| v.is_current).count(), 1);
        // One audit event per successful mutation
        assert_eq!(audit.len(), 6);
    }

    #[test]
    fn test_diff_between_versions() {
        let (storage, _temp) = test_storage();
        let audit = MemoryAuditSink::new();
        let service = ProtocolService::new(&storage, &audit);

        let v1 = service
            .create("PCR Setup", "step 1\nstep 2", "alice")
            .unwrap();
        service
            .commit_edit(v1.group_id, "PCR Setup", "step 1\nstep 2b\nstep 3", "alice")
            .unwrap();

        let diff = service.diff(v1.group_id, 1, 2).unwrap();
        assert_eq!(diff.added(), 2);
        assert_eq!(diff.removed(), 1);

        // Unknown version fails NotFound
        assert!(service.diff(v1.group_id, 1, 9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_audit_unwinds_staged_version() {
        let (storage, _temp) = test_storage();
        let ok_audit = MemoryAuditSink::new();
        let group_id = ProtocolService::new(&storage, &ok_audit)
            .create("PCR Setup", "A", "alice")
            .unwrap()
            .group_id;

        let failing = FailingAuditSink;
        let service = ProtocolService::new(&storage, &failing);
        let err = service
            .commit_edit(group_id, "PCR Setup", "B", "alice")
            .unwrap_err();
        assert!(err.is_durability_fault());
        // The audit failure is the reported error, not a rollback error
        assert!(err.to_string().contains("audit log unavailable"));

        // Neither the in-memory chain nor the file gained a version
        let versions = ProtocolService::new(&storage, &ok_audit)
            .list_versions(group_id)
            .unwrap();
        assert_eq!(versions.len(), 1);
        assert!(versions[0].is_current);
        assert_eq!(versions[0].content, "A");

        storage.protocols.load().unwrap();
        assert_eq!(
            storage.protocols.get_group(group_id).unwrap().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_failed_create_leaves_no_group() {
        let (storage, _temp) = test_storage();
        let failing = FailingAuditSink;
        let service = ProtocolService::new(&storage, &failing);

        let err = service.create("PCR Setup", "A", "alice").unwrap_err();
        assert!(err.is_durability_fault());
        assert!(err.to_string().contains("audit log unavailable"));
        assert!(service.list().unwrap().is_empty());
    }
}
