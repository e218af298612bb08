//! Per-entity mutual exclusion
//!
//! Two concurrent mutations of the same protocol group or entry must not
//! interleave their read-modify-write spans (version allocation, persistence,
//! audit emission). The store runs in a single process, so a keyed lock map
//! is enough: one mutex per entity id, created on first use. Operations on
//! different entities never contend with each other.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::error::{LabbookError, LabbookResult};

/// A map of per-entity mutexes
///
/// `acquire` hands back the entity's `Arc<Mutex<()>>`; the caller locks it
/// for the duration of the read-modify-write span:
///
/// ```rust,ignore
/// let slot = locks.acquire(group_id)?;
/// let _guard = slot.lock().map_err(poisoned_to_storage_fault)?;
/// // allocate version number, persist, emit audit event
/// ```
pub struct EntityLocks<K> {
    slots: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> EntityLocks<K> {
    /// Create an empty lock map
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get the mutex for an entity, creating it on first use
    ///
    /// A poisoned lock map is reported as a storage fault, same as the
    /// repositories' own locks.
    pub fn acquire(&self, key: K) -> LabbookResult<Arc<Mutex<()>>> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Entity lock map poisoned: {}", e)))?;
        Ok(Arc::clone(slots.entry(key).or_default()))
    }
}

impl<K: Eq + Hash + Clone> Default for EntityLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}
