//! Process configuration, read from flags with environment fallbacks.

use std::sync::Arc;

use clap::Parser;

use crate::store::{MemoryStore, SqliteStore, StoreError, TodoStore};

/// Value of `DATABASE_URL` that selects the in-process store.
pub const MEMORY_DATABASE: &str = "memory";

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", about = "To-do list REST API")]
pub struct Config {
    /// Interface to bind.
    ///
    /// Environment variable: `HOST`
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to listen on.
    ///
    /// Environment variable: `PORT`
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite connection string, or `memory` for a non-persistent store.
    ///
    /// Environment variable: `DATABASE_URL`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Upper bound on pooled database connections.
    ///
    /// Environment variable: `DATABASE_MAX_CONNECTIONS`
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Emit logs as JSON lines instead of human-readable text.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the store this configuration names.
    pub async fn open_store(&self) -> Result<Arc<dyn TodoStore>, StoreError> {
        if self.database_url == MEMORY_DATABASE {
            return Ok(Arc::new(MemoryStore::new()));
        }
        let store = SqliteStore::connect(&self.database_url, self.max_connections).await?;
        Ok(Arc::new(store))
    }
}
