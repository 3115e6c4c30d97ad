//! SQLite-backed asset index
//!
//! One row per cache key. The table is created on first use; writes are
//! upserts so a re-generated asset replaces a stale reference.

use crate::types::{AssetRef, AssetStore, CacheKey, StoreError};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SqliteAssetStore {
    pool: SqlitePool,
}

impl SqliteAssetStore {
    /// Open (or create) the database at `db_path` and ensure the schema
    pub async fn connect(db_path: &Path) -> vocard_common::Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new asset database: {}", db_path.display());
        } else {
            info!("Opened existing asset database: {}", db_path.display());
        }

        // WAL lets enrichment workers read while one of them writes
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the `assets` table if needed
    pub async fn from_pool(pool: SqlitePool) -> vocard_common::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                cache_key TEXT PRIMARY KEY,
                asset_ref TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of cached assets
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl AssetStore for SqliteAssetStore {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<AssetRef>, StoreError> {
        let asset: Option<String> =
            sqlx::query_scalar("SELECT asset_ref FROM assets WHERE cache_key = ?")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(asset.map(AssetRef::new))
    }

    async fn put(&self, key: &CacheKey, asset: &AssetRef) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO assets (cache_key, asset_ref, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(cache_key) DO UPDATE SET
                asset_ref = excluded.asset_ref,
                created_at = excluded.created_at
            "#,
        )
        .bind(key.as_str())
        .bind(asset.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
