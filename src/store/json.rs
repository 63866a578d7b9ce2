use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::info;

use super::{AppStore, NewApp, StoreError};
use crate::types::AppEntry;

/// Document backend: the whole catalog lives in one JSON array file. Every
/// mutation rewrites the document via write-temp-then-rename, so a crashed
/// write never truncates the file. Not safe under concurrent writer
/// processes; within the process mutations are serialized by the lock.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        };

        // Fail fast on a corrupt document instead of erroring per request.
        let entries = store.read_entries()?;
        info!(
            "JSON store ready at {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_entries(&self) -> Result<Vec<AppEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_entries(&self, entries: &[AppEntry]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        temp.persist(&self.path)
            .map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }

    fn assign_id(entries: &[AppEntry], millis: i64) -> String {
        let mut id = millis.to_string();
        let mut suffix = 1;
        while entries.iter().any(|entry| entry.id == id) {
            id = format!("{millis}-{suffix}");
            suffix += 1;
        }
        id
    }
}

impl AppStore for JsonFileStore {
    fn list(&self) -> Result<Vec<AppEntry>, StoreError> {
        let _guard = self.lock();
        let mut entries = self.read_entries()?;
        // File order is insertion order; reversing before the stable sort
        // keeps same-timestamp entries newest-first.
        entries.reverse();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(entries)
    }

    fn create(&self, app: NewApp) -> Result<AppEntry, StoreError> {
        let _guard = self.lock();
        let mut entries = self.read_entries()?;

        let now = Utc::now();
        let entry = AppEntry {
            id: Self::assign_id(&entries, now.timestamp_millis()),
            icon: app.resolved_icon(),
            name: app.name,
            download_link: app.download_link,
            added_at: now,
        };

        entries.push(entry.clone());
        self.write_entries(&entries)?;
        Ok(entry)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut entries = self.read_entries()?;

        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() != before {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PLACEHOLDER_ICON;
    use tempfile::tempdir;

    fn new_app(name: &str, icon: Option<&str>, link: &str) -> NewApp {
        NewApp {
            name: name.to_string(),
            icon: icon.map(str::to_string),
            download_link: link.to_string(),
        }
    }

    #[test]
    fn lists_newest_first() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("apps.json")).unwrap();

        store.create(new_app("Alpha", None, "http://d/a")).unwrap();
        store.create(new_app("Beta", None, "http://d/b")).unwrap();
        store.create(new_app("Gamma", None, "http://d/c")).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|app| app.name)
            .collect();
        assert_eq!(names, ["Gamma", "Beta", "Alpha"]);
    }

    #[test]
    fn ids_are_unique_even_within_one_millisecond() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("apps.json")).unwrap();

        for i in 0..20 {
            store
                .create(new_app(&format!("App{i}"), None, "http://d"))
                .unwrap();
        }

        let entries = store.list().unwrap();
        let mut ids: Vec<_> = entries.iter().map(|entry| entry.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn missing_icon_gets_placeholder() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("apps.json")).unwrap();

        let entry = store.create(new_app("NoIcon", None, "http://d")).unwrap();
        assert_eq!(entry.icon, PLACEHOLDER_ICON);
    }

    #[test]
    fn delete_is_idempotent_and_skips_rewrite_when_absent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("apps.json")).unwrap();

        let entry = store.create(new_app("App", None, "http://d")).unwrap();
        store.delete(&entry.id).unwrap();
        store.delete(&entry.id).unwrap();
        store.delete("never-existed").unwrap();

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.create(new_app("Persistent", None, "http://d")).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Persistent");
    }

    #[test]
    fn open_rejects_a_corrupt_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, b"not a json document").unwrap();

        assert!(JsonFileStore::open(&path).is_err());
    }
}
