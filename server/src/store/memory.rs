use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ListQuery, StoreError, TodoStore};
use crate::model::TodoItem;

#[derive(Debug, Default)]
struct Tables {
    /// Primary table keyed by id; `String` ordering is byte-wise.
    items: BTreeMap<String, TodoItem>,
    /// Unique index: description -> owning id.
    descriptions: HashMap<String, String>,
}

/// Process-local store. Each mutation holds the write lock for its whole
/// check-and-write, which makes the description index authoritative under
/// concurrency in the same way a database unique index is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.items.contains_key(&item.id) || tables.descriptions.contains_key(&item.description)
        {
            return Err(StoreError::ConstraintViolation);
        }
        tables
            .descriptions
            .insert(item.description.clone(), item.id.clone());
        tables.items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.tables.read().await.items.get(id).cloned())
    }

    async fn update(
        &self,
        id: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.items.get(id) else {
            return Ok(0);
        };
        let previous = current.description.clone();

        if let Some(owner) = tables.descriptions.get(description) {
            if owner != id {
                return Err(StoreError::ConstraintViolation);
            }
        }

        tables.descriptions.remove(&previous);
        tables
            .descriptions
            .insert(description.to_string(), id.to_string());
        if let Some(item) = tables.items.get_mut(id) {
            item.description = description.to_string();
            item.is_completed = is_completed;
        }
        Ok(1)
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.items.remove(id) {
            Some(item) => {
                tables.descriptions.remove(&item.description);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<TodoItem>, StoreError> {
        let tables = self.tables.read().await;
        let lower = match query.after.as_deref() {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };
        Ok(tables
            .items
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(_, item)| item)
            .filter(|item| query.is_completed.map_or(true, |flag| item.is_completed == flag))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
