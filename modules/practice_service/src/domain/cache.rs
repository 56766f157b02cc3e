//! Read-through cache for owner-scoped rows
//!
//! Entries are keyed by `(owner, id)` and expire after a fixed TTL. Every write
//! invalidates the touched entry plus the owner's list snapshot and bumps the
//! owner's generation, so a read that started before the write cannot store
//! what it fetched. Nothing is refreshed in the background.

use crate::contract::Record;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Per-owner write counter captured by readers before they hit the repository
pub type Generation = u64;

/// Per-entity cache of single rows and per-owner list snapshots
pub struct EntityCache<T> {
    ttl: Duration,
    enabled: bool,
    rows: RwLock<HashMap<(Uuid, Uuid), Entry<Record<T>>>>,
    lists: RwLock<HashMap<Uuid, Entry<Vec<Record<T>>>>>,
    generations: RwLock<HashMap<Uuid, Generation>>,
}

impl<T: Clone> EntityCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            enabled: !ttl.is_zero(),
            rows: RwLock::new(HashMap::new()),
            lists: RwLock::new(HashMap::new()),
            generations: RwLock::new(HashMap::new()),
        }
    }

    /// Current write generation for `owner`; pass it back to `put`/`put_list`
    pub fn generation(&self, owner: Uuid) -> Generation {
        self.generations.read().get(&owner).copied().unwrap_or(0)
    }

    fn bump(&self, owner: Uuid) {
        *self.generations.write().entry(owner).or_insert(0) += 1;
    }

    pub fn get(&self, owner: Uuid, id: Uuid) -> Option<Record<T>> {
        if !self.enabled {
            return None;
        }
        let rows = self.rows.read();
        rows.get(&(owner, id))
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store a row read at `seen`. Skipped if the owner was written to since.
    pub fn put(&self, record: &Record<T>, seen: Generation) {
        if !self.enabled {
            return;
        }
        let mut rows = self.rows.write();
        if self.generation(record.user_id) == seen {
            rows.insert((record.user_id, record.id), Entry::new(record.clone()));
        }
    }

    pub fn get_list(&self, owner: Uuid) -> Option<Vec<Record<T>>> {
        if !self.enabled {
            return None;
        }
        let lists = self.lists.read();
        lists
            .get(&owner)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store a list snapshot read at `seen`. Skipped if the owner was written to since.
    pub fn put_list(&self, owner: Uuid, records: &[Record<T>], seen: Generation) {
        if !self.enabled {
            return;
        }
        let mut lists = self.lists.write();
        if self.generation(owner) == seen {
            lists.insert(owner, Entry::new(records.to_vec()));
        }
    }

    /// Drop one row and the owner's list snapshot
    pub fn invalidate(&self, owner: Uuid, id: Uuid) {
        self.bump(owner);
        self.rows.write().remove(&(owner, id));
        self.lists.write().remove(&owner);
    }

    /// Drop only the owner's list snapshot (after an insert)
    pub fn invalidate_list(&self, owner: Uuid) {
        self.bump(owner);
        self.lists.write().remove(&owner);
    }

    /// Remove expired entries
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        {
            let mut rows = self.rows.write();
            let before = rows.len();
            rows.retain(|_, entry| entry.is_fresh(ttl));
            removed += before - rows.len();
        }
        {
            let mut lists = self.lists.write();
            let before = lists.len();
            lists.retain(|_, entry| entry.is_fresh(ttl));
            removed += before - lists.len();
        }
        removed
    }
}
