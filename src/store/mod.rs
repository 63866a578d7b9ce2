//! Record store abstraction over the two interchangeable persistence
//! backends: a single-table SQLite database and a flat JSON document file.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::AppEntry;

pub mod json;
pub mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

/// Icon applied when the create payload omits one.
pub const PLACEHOLDER_ICON: &str = "https://via.placeholder.com/150?text=App";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Timestamp(String),
}

/// Validated create request. `icon` stays optional here; the backend applies
/// the placeholder so the default is uniform regardless of storage.
#[derive(Debug, Clone)]
pub struct NewApp {
    pub name: String,
    pub icon: Option<String>,
    pub download_link: String,
}

impl NewApp {
    pub(crate) fn resolved_icon(&self) -> String {
        self.icon
            .as_deref()
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or(PLACEHOLDER_ICON)
            .to_string()
    }
}

/// Persistence contract for catalog entries. `delete` is idempotent: an
/// absent (or even unparseable) id is a successful no-op.
pub trait AppStore: Send + Sync {
    /// All entries, newest first.
    fn list(&self) -> Result<Vec<AppEntry>, StoreError>;

    /// Assigns id and creation timestamp, persists durably before returning.
    fn create(&self, app: NewApp) -> Result<AppEntry, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Timestamp(format!("invalid timestamp '{value}': {err}")))
}
