use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog record, serialized camelCase on the wire. The id is an
/// opaque string: the SQLite backend renders row ids as decimal strings, the
/// flat-file backend derives ids from the creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub download_link: String,
    pub added_at: DateTime<Utc>,
}

/// Create payload. Fields are optional so that presence is validated in the
/// handler with a 400, not rejected by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateApp {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub download_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_admin: bool,
}
