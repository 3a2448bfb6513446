/// Identity cache: stable keys to long-lived render entities.
///
/// Entities live in a SlotMap, so a handle and the entity it points to
/// stay put while the entity is updated in place. A generation starts with
/// `begin_generation`; every entity touched through `add_or_update`,
/// `update` or `mark_used` survives the matching `end_generation`, the
/// rest are pruned.

use std::hash::Hash;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{Key, SecondaryMap, SlotMap};
use crate::provider::DataId;

/// Content-addressed entity map with per-generation pruning
pub struct IdentityCache<K, H: Key, T> {
    entities: SlotMap<H, T>,
    lookup: FxHashMap<K, H>,
    keys: SecondaryMap<H, K>,
    used: FxHashSet<H>,
    recalc: FxHashSet<DataId>,
}

impl<K, H, T> Default for IdentityCache<K, H, T>
where
    K: Eq + Hash + Clone,
    H: Key,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H, T> IdentityCache<K, H, T>
where
    K: Eq + Hash + Clone,
    H: Key,
{
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            lookup: FxHashMap::default(),
            keys: SecondaryMap::new(),
            used: FxHashSet::default(),
            recalc: FxHashSet::default(),
        }
    }

    // ===== GENERATION =====

    /// Start a generation: nothing is used yet
    pub fn begin_generation(&mut self) {
        self.used.clear();
    }

    /// End a generation, deleting every entity not used since
    /// `begin_generation` when `do_delete` is set.
    ///
    /// Returns the number of pruned entities. Usage and recalc tags are
    /// reset either way.
    pub fn end_generation(&mut self, do_delete: bool) -> usize {
        let mut pruned = 0;
        if do_delete {
            let stale: Vec<H> = self
                .entities
                .keys()
                .filter(|handle| !self.used.contains(handle))
                .collect();
            for handle in stale {
                self.entities.remove(handle);
                if let Some(key) = self.keys.remove(handle) {
                    self.lookup.remove(&key);
                }
                pruned += 1;
            }
        }
        self.used.clear();
        self.recalc.clear();
        pruned
    }

    // ===== RESOLUTION =====

    /// Find the entity for `key`, creating it with `create` when absent.
    ///
    /// Marks the entity used. The flag is true for a new entity.
    pub fn resolve_or_create(&mut self, key: &K, create: impl FnOnce() -> T) -> (H, bool) {
        if let Some(&handle) = self.lookup.get(key) {
            self.used.insert(handle);
            return (handle, false);
        }
        let handle = self.entities.insert(create());
        self.lookup.insert(key.clone(), handle);
        self.keys.insert(handle, key.clone());
        self.used.insert(handle);
        (handle, true)
    }

    /// Like `resolve_or_create` with `T::default()`, also reporting
    /// structural updates: the flag is true when the entity is new, when
    /// `id` is tagged for recalc, or when a `parent` distinct from `id` is.
    pub fn add_or_update(&mut self, key: &K, id: DataId, parent: Option<DataId>) -> (H, bool)
    where
        T: Default,
    {
        let (handle, created) = self.resolve_or_create(key, T::default);
        if created {
            return (handle, true);
        }
        let parent_recalc = parent.is_some_and(|parent| parent != id && self.recalc.contains(&parent));
        (handle, self.recalc.contains(&id) || parent_recalc)
    }

    /// Mark an existing entity used; true when `id` is tagged for recalc
    pub fn update(&mut self, handle: H, id: DataId) -> bool {
        self.used.insert(handle);
        self.recalc.contains(&id)
    }

    /// Insert a new entity under `key`, replacing any previous one.
    ///
    /// Marks the entity used.
    pub fn add(&mut self, key: &K, entity: T) -> H {
        if let Some(previous) = self.lookup.remove(key) {
            self.entities.remove(previous);
            self.keys.remove(previous);
            self.used.remove(&previous);
        }
        let handle = self.entities.insert(entity);
        self.lookup.insert(key.clone(), handle);
        self.keys.insert(handle, key.clone());
        self.used.insert(handle);
        handle
    }

    /// Handle for `key`, without marking it used
    pub fn find(&self, key: &K) -> Option<H> {
        self.lookup.get(key).copied()
    }

    pub fn mark_used(&mut self, handle: H) {
        if self.entities.contains_key(handle) {
            self.used.insert(handle);
        }
    }

    /// Whether the entity for `key` was used this generation
    pub fn is_used(&self, key: &K) -> bool {
        self.lookup
            .get(key)
            .is_some_and(|handle| self.used.contains(handle))
    }

    // ===== RECALC =====

    /// Tag a provider data-block as changed since the previous sync
    pub fn set_recalc(&mut self, id: DataId) {
        self.recalc.insert(id);
    }

    pub fn has_recalc(&self) -> bool {
        !self.recalc.is_empty()
    }

    pub fn clear_recalc(&mut self) {
        self.recalc.clear();
    }

    // ===== ACCESS =====

    pub fn get(&self, handle: H) -> Option<&T> {
        self.entities.get(handle)
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.entities.get_mut(handle)
    }

    /// Key an entity was created under
    pub fn key(&self, handle: H) -> Option<&K> {
        self.keys.get(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
#[path = "id_map_tests.rs"]
mod tests;
