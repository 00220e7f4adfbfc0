use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use super::{ListQuery, StoreError, TodoStore};
use crate::model::TodoItem;
use crate::schema::{self, COL_DESCRIPTION, COL_ID, COL_IS_COMPLETED, TABLE};

/// SQLite-backed store. The unique index on `description` is the only
/// arbiter of duplicates; a refused write comes back as
/// [`StoreError::ConstraintViolation`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `url` and apply the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        info!(url, max_connections, "opened sqlite store");
        Self::from_pool(pool).await
    }

    /// A private in-memory database. Pinned to one connection that is never
    /// recycled, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        for statement in schema::statements() {
            sqlx::query(&statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}

/// Unique-index refusals become `ConstraintViolation`; anything else is
/// passed through untouched.
fn classify_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::ConstraintViolation;
        }
    }
    StoreError::Storage(err)
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {TABLE} ({}) VALUES (?, ?, ?)",
            schema::select_list()
        );
        sqlx::query(&sql)
            .bind(item.id.as_str())
            .bind(item.description.as_str())
            .bind(item.is_completed)
            .execute(&self.pool)
            .await
            .map_err(classify_write_error)?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {TABLE} WHERE {COL_ID} = ?",
            schema::select_list()
        );
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn update(
        &self,
        id: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<u64, StoreError> {
        let sql = format!(
            "UPDATE {TABLE} SET {COL_DESCRIPTION} = ?, {COL_IS_COMPLETED} = ? WHERE {COL_ID} = ?"
        );
        let result = sqlx::query(&sql)
            .bind(description)
            .bind(is_completed)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify_write_error)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {TABLE} WHERE {COL_ID} = ?");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<TodoItem>, StoreError> {
        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM {TABLE} WHERE 1 = 1",
            schema::select_list()
        ));
        if let Some(after) = query.after.as_deref() {
            builder.push(format!(" AND {COL_ID} > ")).push_bind(after);
        }
        if let Some(flag) = query.is_completed {
            builder
                .push(format!(" AND {COL_IS_COMPLETED} = "))
                .push_bind(flag);
        }
        builder
            .push(format!(" ORDER BY {COL_ID} LIMIT "))
            .push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX));

        let items = builder
            .build_query_as::<TodoItem>()
            .fetch_all(&self.pool)
            .await?;
        debug!(
            after = ?query.after,
            is_completed = ?query.is_completed,
            limit = query.limit,
            returned = items.len(),
            "listed items"
        );
        Ok(items)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("closed sqlite store");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::contract;

    async fn store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn insert_then_get_returns_item() {
        contract::insert_then_get_returns_item(&store().await).await;
    }

    #[tokio::test]
    async fn duplicate_description_is_rejected() {
        contract::duplicate_description_is_rejected(&store().await).await;
    }

    #[tokio::test]
    async fn description_match_is_case_sensitive() {
        contract::description_match_is_case_sensitive(&store().await).await;
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        contract::update_replaces_fields(&store().await).await;
    }

    #[tokio::test]
    async fn update_may_keep_own_description() {
        contract::update_may_keep_own_description(&store().await).await;
    }

    #[tokio::test]
    async fn update_collision_leaves_both_unchanged() {
        contract::update_collision_leaves_both_unchanged(&store().await).await;
    }

    #[tokio::test]
    async fn missing_id_counts_zero() {
        contract::missing_id_counts_zero(&store().await).await;
    }

    #[tokio::test]
    async fn delete_frees_description() {
        contract::delete_frees_description(&store().await).await;
    }

    #[tokio::test]
    async fn list_orders_filters_and_limits() {
        contract::list_orders_filters_and_limits(&store().await).await;
    }

    #[tokio::test]
    async fn reused_id_is_a_constraint_violation() {
        let store = store().await;
        store
            .insert(&contract::item("01a", "Buy milk", false))
            .await
            .unwrap();
        let err = store
            .insert(&contract::item("01a", "Buy bread", false))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation), "{err:?}");
    }

    #[tokio::test]
    async fn overlong_description_is_a_storage_error() {
        let store = store().await;
        let err = store
            .insert(&contract::item("01a", &"x".repeat(51), false))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)), "{err:?}");
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("todos.db").display());

        let first = SqliteStore::connect(&url, 2).await.unwrap();
        first
            .insert(&contract::item("01a", "Buy milk", true))
            .await
            .unwrap();
        first.close().await;

        let second = SqliteStore::connect(&url, 2).await.unwrap();
        assert_eq!(
            second.get("01a").await.unwrap(),
            Some(contract::item("01a", "Buy milk", true))
        );
        second.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_one_description_admit_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("todos.db").display());
        let store = Arc::new(SqliteStore::connect(&url, 4).await.unwrap());
        let ids = contract::sequential_ids(8);

        let tasks: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.insert(&contract::item(&id, "Same text", false)).await
                })
            })
            .collect();

        let mut ok = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => ok += 1,
                Err(StoreError::ConstraintViolation) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);
        store.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_to_one_description_admit_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("todos.db").display());
        let store = Arc::new(SqliteStore::connect(&url, 4).await.unwrap());

        contract::concurrent_updates_to_one_description_admit_exactly_one(store.clone()).await;
        store.close().await;
    }
}
