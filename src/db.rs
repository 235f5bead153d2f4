use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::models::Paste;

const CREATE_PASTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS pastes (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    expires_at TIMESTAMPTZ,
    max_views INT,
    view_count INT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to a database by URL with the given TLS mode.
    pub async fn connect(url: &str, ssl_mode: PgSslMode) -> anyhow::Result<Self> {
        let options = url.parse::<PgConnectOptions>()?.ssl_mode(ssl_mode);
        Ok(Self {
            pool: PgPoolOptions::new().connect_with(options).await?,
        })
    }

    /// Connect without touching the network; the pool dials on first use.
    #[cfg(test)]
    pub fn connect_lazy(url: &str) -> anyhow::Result<Self> {
        let options = url.parse::<PgConnectOptions>()?;
        Ok(Self {
            pool: PgPoolOptions::new().connect_lazy_with(options),
        })
    }

    /// Idempotently create the pastes table.
    pub async fn init_schema(&self) -> sqlx::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(CREATE_PASTES_TABLE).execute(&mut conn).await?;
        Ok(())
    }

    /// Get a paste by id.
    pub async fn get_paste(&mut self, id: &str) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "SELECT id, content, expires_at, max_views, view_count, created_at FROM pastes \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Insert a paste with a fresh view count.
    pub async fn insert_paste(
        &mut self,
        id: &str,
        content: &str,
        expires_at: Option<DateTime<Utc>>,
        max_views: Option<i32>,
    ) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "INSERT INTO pastes (id, content, expires_at, max_views) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(content)
        .bind(expires_at)
        .bind(max_views)
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    /// Bump a paste's view count by one.
    pub async fn increment_views(&mut self, id: &str) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("UPDATE pastes SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut conn)
            .await?;
        Ok(())
    }
}
