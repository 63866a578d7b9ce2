use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::{info, warn};

use super::{parse_datetime, AppStore, NewApp, StoreError, PLACEHOLDER_ICON};
use crate::types::AppEntry;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS apps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    icon TEXT,
    downloadLink TEXT NOT NULL,
    addedAt TEXT NOT NULL
)";

/// Relational backend: one row per entry, single-row atomic writes. Row ids
/// are rendered as decimal strings at the trait boundary.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            warn!("Failed to enable WAL mode: {err}");
        }
        conn.execute_batch(SCHEMA)?;

        info!("SQLite store ready at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AppStore for SqliteStore {
    fn list(&self) -> Result<Vec<AppEntry>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, icon, downloadLink, addedAt
             FROM apps
             ORDER BY addedAt DESC, id DESC",
        )?;

        let mut rows = stmt.query([])?;
        let mut apps = Vec::new();
        while let Some(row) = rows.next()? {
            apps.push(AppEntry {
                id: row.get::<_, i64>(0)?.to_string(),
                name: row.get(1)?,
                icon: row
                    .get::<_, Option<String>>(2)?
                    .unwrap_or_else(|| PLACEHOLDER_ICON.to_string()),
                download_link: row.get(3)?,
                added_at: parse_datetime(&row.get::<_, String>(4)?)?,
            });
        }

        Ok(apps)
    }

    fn create(&self, app: NewApp) -> Result<AppEntry, StoreError> {
        let now = Utc::now();
        let icon = app.resolved_icon();
        // Fixed-width timestamps keep the addedAt DESC ordering chronological
        // under string comparison.
        let added_at = now.to_rfc3339_opts(SecondsFormat::Micros, true);

        let conn = self.lock();
        conn.execute(
            "INSERT INTO apps (name, icon, downloadLink, addedAt)
             VALUES (?1, ?2, ?3, ?4)",
            params![app.name, icon, app.download_link, added_at],
        )?;
        let id = conn.last_insert_rowid();

        Ok(AppEntry {
            id: id.to_string(),
            name: app.name,
            icon,
            download_link: app.download_link,
            added_at: now,
        })
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        // Ids from this backend are decimal strings; anything else cannot
        // name a row, which makes the delete the usual absent-id no-op.
        let Ok(row_id) = id.parse::<i64>() else {
            return Ok(());
        };

        self.lock()
            .execute("DELETE FROM apps WHERE id = ?1", params![row_id])?;
        Ok(())
    }
}
