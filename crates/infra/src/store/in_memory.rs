use std::collections::BTreeMap;
use std::sync::RwLock;

use dashgate_core::Entity;

use crate::store::{EntityStore, Query, StoreError};

/// In-memory entity store for tests/dev.
///
/// Keys are `(project, name)`; listing returns entities in key order.
#[derive(Debug)]
pub struct InMemoryEntityStore<E> {
    inner: RwLock<BTreeMap<(String, String), E>>,
}

impl<E> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

fn key_of<E: Entity>(entity: &E) -> (String, String) {
    (entity.project().to_string(), entity.name().to_string())
}

impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    fn create(&self, entity: E) -> Result<E, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let key = key_of(&entity);
        if map.contains_key(&key) {
            return Err(StoreError::already_exists(E::KIND, &key.0, &key.1));
        }
        map.insert(key, entity.clone());
        Ok(entity)
    }

    fn get(&self, project: &str, name: &str) -> Result<E, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.get(&(project.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(E::KIND, project, name))
    }

    fn update(&self, entity: E) -> Result<E, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&key_of(&entity)) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(StoreError::not_found(E::KIND, entity.project(), entity.name())),
        }
    }

    fn delete(&self, project: &str, name: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&(project.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(E::KIND, project, name))
    }

    fn list(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .filter(|e| query.matches(e.metadata()))
            .cloned()
            .collect())
    }
}
