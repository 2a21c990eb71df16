use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use startpage_core::Settings;

/// Key under which the dashboard settings document is stored
pub const SETTINGS_KEY: &str = "settings";

/// Repository for raw key-value documents
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get(0)))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Repository for the dashboard settings document
pub struct SettingsRepository {
    kv: KvRepository,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            kv: KvRepository::new(pool),
        }
    }

    /// Load settings, merged over defaults
    ///
    /// A missing or unreadable document yields the defaults; only database
    /// failures are errors.
    pub async fn load(&self) -> Result<Settings> {
        let Some(stored) = self.kv.get(SETTINGS_KEY).await? else {
            tracing::debug!("No stored settings, using defaults");
            return Ok(Settings::default());
        };

        match serde_json::from_str::<Settings>(&stored) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::error!("Failed to parse stored settings, using defaults: {}", e);
                Ok(Settings::default())
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings).context("Failed to serialize settings")?;
        self.kv.set(SETTINGS_KEY, &json).await?;
        tracing::debug!("Saved settings");
        Ok(())
    }
}
