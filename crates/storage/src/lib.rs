use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite, SqliteConnection,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, warn};

use shared::domain::UserData;

/// Keys under which the signed-in state is cached.
pub mod keys {
    /// JSON-encoded `UserData` from the last successful login.
    pub const USER_DATA: &str = "userData";
    /// Raw token sent in the `Authorization` header.
    pub const USER_TOKEN: &str = "userToken";
    /// Mobile number awaiting OTP verification.
    pub const CONTACT: &str = "contact";
    /// Mobile number most recently confirmed by `checkUser`.
    pub const CHECKED_USER_MOBILE: &str = "checkedUserMobile";
    /// Status to return to after a break or meeting.
    pub const PREVIOUS_WORKING_STATUS: &str = "previousWorkingStatus";
}

/// Credential cache consumed by the session flows. `Storage` is the only
/// production implementation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_user(&self, user: &UserData) -> Result<()>;
    async fn load_user(&self) -> Result<Option<UserData>>;
    async fn load_token(&self) -> Result<Option<String>>;
    async fn remember_contact(&self, mobile: &str) -> Result<()>;
    async fn contact(&self) -> Result<Option<String>>;
    async fn clear_session(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Each in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open credential cache at '{database_url}'"))?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        upsert(&mut conn, key, value).await
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_entry(key).await?.map(|item| item.value))
    }

    pub async fn get_entry(&self, key: &str) -> Result<Option<StoredItem>> {
        let row = sqlx::query("SELECT key, value, updated_at FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read '{key}'"))?;
        Ok(row.map(|r| StoredItem {
            key: r.get::<String, _>(0),
            value: r.get::<String, _>(1),
            updated_at: r.get::<DateTime<Utc>, _>(2),
        }))
    }

    pub async fn remove_item(&self, key: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        delete(&mut conn, key).await
    }
}

async fn upsert(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO app_state (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .with_context(|| format!("failed to store '{key}'"))?;
    Ok(())
}

async fn delete(conn: &mut SqliteConnection, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM app_state WHERE key = ?")
        .bind(key)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("failed to remove '{key}'"))?;
    Ok(result.rows_affected() > 0)
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl SessionStore for Storage {
    async fn save_user(&self, user: &UserData) -> Result<()> {
        let encoded = serde_json::to_string(user).context("failed to encode userData")?;
        let mut tx = self.pool.begin().await?;
        upsert(&mut tx, keys::USER_DATA, &encoded).await?;
        upsert(&mut tx, keys::USER_TOKEN, &user.token).await?;
        tx.commit().await.context("failed to commit signed-in user")?;
        debug!(user_id = user.id.0, "cached signed-in user");
        Ok(())
    }

    async fn load_user(&self) -> Result<Option<UserData>> {
        let Some(raw) = self.get_item(keys::USER_DATA).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserData>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                // A corrupt entry is treated like a signed-out device.
                warn!("discarding unreadable userData: {err}");
                Ok(None)
            }
        }
    }

    async fn load_token(&self) -> Result<Option<String>> {
        Ok(self
            .get_item(keys::USER_TOKEN)
            .await?
            .filter(|token| !token.is_empty()))
    }

    async fn remember_contact(&self, mobile: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        upsert(&mut tx, keys::CONTACT, mobile).await?;
        upsert(&mut tx, keys::CHECKED_USER_MOBILE, mobile).await?;
        tx.commit().await.context("failed to commit contact")?;
        Ok(())
    }

    async fn contact(&self) -> Result<Option<String>> {
        self.get_item(keys::CONTACT).await
    }

    async fn clear_session(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for key in [
            keys::USER_DATA,
            keys::USER_TOKEN,
            keys::CONTACT,
            keys::CHECKED_USER_MOBILE,
            keys::PREVIOUS_WORKING_STATUS,
        ] {
            delete(&mut tx, key).await?;
        }
        tx.commit().await.context("failed to commit session clear")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
