//! Persistence for to-do items.
//!
//! # Design
//! `TodoStore` is the seam between the HTTP layer and storage. Every
//! operation is a single atomic unit against the backend. The rule that at
//! most one item exists per description belongs to the backend: insert and
//! update never pre-check, they attempt the write and report
//! [`StoreError::ConstraintViolation`] when the backend refuses it.
//!
//! Two backends exist: [`SqliteStore`] for deployments and [`MemoryStore`]
//! for tests and throwaway instances.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::model::TodoItem;

/// Errors raised by a [`TodoStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another item already holds the description. Recoverable.
    #[error("description is already used by another item")]
    ConstraintViolation,

    /// The backend failed for any other reason. Not recoverable locally.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Criteria for a range scan over items ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Keep only items whose completion flag matches.
    pub is_completed: Option<bool>,
    /// Keep only items whose id sorts strictly after this one.
    pub after: Option<String>,
    /// Maximum number of items returned.
    pub limit: usize,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persist a new item. Fails with `ConstraintViolation` if the
    /// description or id is taken.
    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<TodoItem>, StoreError>;

    /// Replace description and completion flag. Returns the number of rows
    /// touched, which is zero when `id` does not exist.
    async fn update(
        &self,
        id: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<u64, StoreError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;

    /// Items matching `query`, ascending by byte-wise id order.
    async fn list(&self, query: &ListQuery) -> Result<Vec<TodoItem>, StoreError>;

    /// Release backend resources. Further calls may fail.
    async fn close(&self) {}
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every backend must share, run once per implementation.

    use std::sync::Arc;

    use super::*;
    use crate::id::{FixedClock, IdGenerator, UlidGenerator};
    use chrono::{Duration, TimeZone, Utc};

    pub fn item(id: &str, description: &str, is_completed: bool) -> TodoItem {
        TodoItem {
            id: id.to_string(),
            description: description.to_string(),
            is_completed,
        }
    }

    /// Ids one millisecond apart, so they sort in creation order.
    pub fn sequential_ids(n: usize) -> Vec<String> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let clock = FixedClock::new(t0 + Duration::milliseconds(i as i64));
                UlidGenerator::new(clock).new_id()
            })
            .collect()
    }

    pub async fn insert_then_get_returns_item(store: &dyn TodoStore) {
        let created = item("01a", "Buy milk", false);
        store.insert(&created).await.unwrap();
        assert_eq!(store.get("01a").await.unwrap(), Some(created));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    pub async fn duplicate_description_is_rejected(store: &dyn TodoStore) {
        store.insert(&item("01a", "Buy milk", false)).await.unwrap();
        let err = store
            .insert(&item("01b", "Buy milk", true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation), "{err:?}");
        assert_eq!(store.get("01b").await.unwrap(), None);
    }

    pub async fn description_match_is_case_sensitive(store: &dyn TodoStore) {
        store.insert(&item("01a", "Buy milk", false)).await.unwrap();
        store.insert(&item("01b", "buy milk", false)).await.unwrap();
    }

    pub async fn update_replaces_fields(store: &dyn TodoStore) {
        store.insert(&item("01a", "Buy milk", false)).await.unwrap();
        let rows = store.update("01a", "Buy oat milk", true).await.unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            store.get("01a").await.unwrap(),
            Some(item("01a", "Buy oat milk", true))
        );
    }

    pub async fn update_may_keep_own_description(store: &dyn TodoStore) {
        store.insert(&item("01a", "Buy milk", false)).await.unwrap();
        assert_eq!(store.update("01a", "Buy milk", true).await.unwrap(), 1);
    }

    pub async fn update_collision_leaves_both_unchanged(store: &dyn TodoStore) {
        store.insert(&item("01a", "Description 1", false)).await.unwrap();
        store.insert(&item("01b", "Description 2", false)).await.unwrap();

        let err = store
            .update("01b", "Description 1", true)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation), "{err:?}");

        assert_eq!(
            store.get("01a").await.unwrap(),
            Some(item("01a", "Description 1", false))
        );
        assert_eq!(
            store.get("01b").await.unwrap(),
            Some(item("01b", "Description 2", false))
        );
    }

    pub async fn missing_id_counts_zero(store: &dyn TodoStore) {
        assert_eq!(store.update("missing", "Anything", true).await.unwrap(), 0);
        assert_eq!(store.delete("missing").await.unwrap(), 0);
    }

    pub async fn delete_frees_description(store: &dyn TodoStore) {
        store.insert(&item("01a", "Buy milk", false)).await.unwrap();
        assert_eq!(store.delete("01a").await.unwrap(), 1);
        assert_eq!(store.get("01a").await.unwrap(), None);
        store.insert(&item("01b", "Buy milk", false)).await.unwrap();
    }

    pub async fn list_orders_filters_and_limits(store: &dyn TodoStore) {
        let ids = sequential_ids(6);
        // Insert out of order to prove ordering comes from the id.
        for i in [3, 0, 5, 1, 4, 2] {
            store
                .insert(&item(&ids[i], &format!("Description {i}"), i % 2 == 0))
                .await
                .unwrap();
        }

        let all = store
            .list(&ListQuery {
                is_completed: None,
                after: None,
                limit: 100,
            })
            .await
            .unwrap();
        let listed: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        let expected: Vec<&str> = ids.iter().map(String::as_str).collect();
        assert_eq!(listed, expected);

        let completed = store
            .list(&ListQuery {
                is_completed: Some(true),
                after: None,
                limit: 100,
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 3);
        assert!(completed.iter().all(|t| t.is_completed));

        let after = store
            .list(&ListQuery {
                is_completed: Some(false),
                after: Some(ids[1].clone()),
                limit: 1,
            })
            .await
            .unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, ids[3]);

        let past_end = store
            .list(&ListQuery {
                is_completed: None,
                after: Some(ids[5].clone()),
                limit: 10,
            })
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    /// Every item is renamed to the same text at once; one rename may win.
    pub async fn concurrent_updates_to_one_description_admit_exactly_one(
        store: Arc<dyn TodoStore>,
    ) {
        let ids = sequential_ids(8);
        for (i, id) in ids.iter().enumerate() {
            store
                .insert(&item(id, &format!("Description {i}"), false))
                .await
                .unwrap();
        }

        let tasks: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.update(&id, "Same text", true).await })
            })
            .collect();

        let mut ok = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(1) => ok += 1,
                Ok(rows) => panic!("unexpected row count: {rows}"),
                Err(StoreError::ConstraintViolation) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);

        let all = store
            .list(&ListQuery {
                is_completed: None,
                after: None,
                limit: 100,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), ids.len());
        let renamed: Vec<_> = all
            .iter()
            .filter(|t| t.description == "Same text")
            .collect();
        assert_eq!(renamed.len(), 1);
        assert!(renamed[0].is_completed);
        assert_eq!(all.iter().filter(|t| t.is_completed).count(), 1);
    }
}
