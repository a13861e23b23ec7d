mod elements;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::Element;

/// Store handles all database operations, delegating to per-entity repo modules.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory store for tests. A single connection keeps all queries on
    /// the same ephemeral database.
    #[cfg(test)]
    pub async fn memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ========== Element Operations ==========

    /// Replace all cached rows for one source tag, atomically
    pub async fn replace_elements(&self, src: &str, elements: &[Element]) -> Result<()> {
        elements::ElementRepo::replace_source(&self.pool, src, elements).await
    }

    /// Look up one element by hostname, qualifying it with the default domain
    /// first. Unknown hostname is an empty result, not an error.
    pub async fn get_element(&self, hostname: &str, default_domain: &str) -> Result<Option<Element>> {
        elements::ElementRepo::get(&self.pool, hostname, default_domain).await
    }

    /// List all cached elements in insertion order
    pub async fn list_elements(&self, default_domain: &str) -> Result<Vec<Element>> {
        elements::ElementRepo::list(&self.pool, default_domain).await
    }
}
