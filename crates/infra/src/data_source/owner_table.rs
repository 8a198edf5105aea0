//! Owner-isolated record table used by the in-memory backend.

use std::collections::HashMap;
use std::sync::RwLock;

use bizlens_core::{Entity, RecordId, UserId};

use super::error::{DataResult, DataSourceError};

/// Records keyed by id, always filtered by owner on the way out.
///
/// A record belonging to another user is indistinguishable from a missing one.
#[derive(Debug)]
pub struct OwnerTable<V> {
    inner: RwLock<HashMap<RecordId, V>>,
}

impl<V> OwnerTable<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for OwnerTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OwnerTable<V>
where
    V: Entity + Clone,
{
    pub fn get(&self, owner: UserId, id: RecordId) -> DataResult<V> {
        let map = self.inner.read().map_err(|_| DataSourceError::Poisoned)?;
        map.get(&id)
            .filter(|v| v.owner_id() == owner)
            .cloned()
            .ok_or(DataSourceError::NotFound)
    }

    pub fn list(&self, owner: UserId) -> DataResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| DataSourceError::Poisoned)?;
        Ok(map.values().filter(|v| v.owner_id() == owner).cloned().collect())
    }

    pub fn insert(&self, value: V) -> DataResult<V> {
        let mut map = self.inner.write().map_err(|_| DataSourceError::Poisoned)?;
        map.insert(value.id(), value.clone());
        Ok(value)
    }

    /// Replace an existing record owned by the same user.
    pub fn replace(&self, value: V) -> DataResult<V> {
        let mut map = self.inner.write().map_err(|_| DataSourceError::Poisoned)?;
        match map.get(&value.id()) {
            Some(existing) if existing.owner_id() == value.owner_id() => {
                map.insert(value.id(), value.clone());
                Ok(value)
            }
            _ => Err(DataSourceError::NotFound),
        }
    }

    /// Mutate one owned record in place and return the updated copy.
    pub fn update<F>(&self, owner: UserId, id: RecordId, f: F) -> DataResult<V>
    where
        F: FnOnce(&mut V),
    {
        let mut map = self.inner.write().map_err(|_| DataSourceError::Poisoned)?;
        let value = map
            .get_mut(&id)
            .filter(|v| v.owner_id() == owner)
            .ok_or(DataSourceError::NotFound)?;
        f(value);
        Ok(value.clone())
    }

    /// Mutate every owned record matching `pred`; returns how many were touched.
    pub fn update_where<P, F>(&self, owner: UserId, pred: P, mut f: F) -> DataResult<usize>
    where
        P: Fn(&V) -> bool,
        F: FnMut(&mut V),
    {
        let mut map = self.inner.write().map_err(|_| DataSourceError::Poisoned)?;
        let mut touched = 0;
        for v in map.values_mut().filter(|v| v.owner_id() == owner) {
            if pred(&*v) {
                f(v);
                touched += 1;
            }
        }
        Ok(touched)
    }

    pub fn remove(&self, owner: UserId, id: RecordId) -> DataResult<()> {
        let mut map = self.inner.write().map_err(|_| DataSourceError::Poisoned)?;
        match map.get(&id) {
            Some(v) if v.owner_id() == owner => {
                map.remove(&id);
                Ok(())
            }
            _ => Err(DataSourceError::NotFound),
        }
    }
}
