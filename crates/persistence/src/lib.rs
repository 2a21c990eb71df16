pub mod db;
pub mod repository;

pub use db::{init_db, init_memory_db};
pub use repository::{KvRepository, SettingsRepository, SETTINGS_KEY};

pub use sqlx::SqlitePool;
