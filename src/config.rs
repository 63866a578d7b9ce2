use std::{env, path::PathBuf};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub secure_cookies: bool,
    pub backend: StorageBackend,
    pub storage_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                warn!("Invalid PORT '{value}': {err}, using 3000");
                3000
            }),
            Err(_) => 3000,
        };

        let backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("json") => StorageBackend::Json,
            Ok("sqlite") | Err(_) => StorageBackend::Sqlite,
            Ok(other) => {
                warn!("Unknown STORAGE_BACKEND '{other}', using sqlite");
                StorageBackend::Sqlite
            }
        };

        let storage_path = env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| match backend {
                StorageBackend::Sqlite => PathBuf::from("apps.db"),
                StorageBackend::Json => PathBuf::from("apps.json"),
            });

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| {
            warn!("ADMIN_USERNAME not set, using default");
            "admin".to_string()
        });
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("ADMIN_PASSWORD not set, using default");
            "admin".to_string()
        });

        let secure_cookies = matches!(
            env::var("SECURE_COOKIES").as_deref(),
            Ok("1") | Ok("true")
        );

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Self {
            port,
            admin_username,
            admin_password,
            secure_cookies,
            backend,
            storage_path,
            static_dir,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
