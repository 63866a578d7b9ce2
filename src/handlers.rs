use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

use crate::{
    error::ApiError,
    session::SESSION_COOKIE,
    state::AppState,
    store::NewApp,
    types::{AppEntry, AuthStatus, CreateApp, LoginRequest, SuccessResponse},
};

pub async fn list_apps(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AppEntry>>, ApiError> {
    let apps = state
        .store
        .list()
        .map_err(|err| ApiError::storage("Failed to read apps", err))?;
    Ok(Json(apps))
}

pub async fn create_app(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<CreateApp>,
) -> Result<Json<AppEntry>, ApiError> {
    require_admin(&state, &jar)?;

    let name = payload.name.filter(|name| !name.trim().is_empty());
    let download_link = payload
        .download_link
        .filter(|link| !link.trim().is_empty());
    let (Some(name), Some(download_link)) = (name, download_link) else {
        return Err(ApiError::Validation(
            "Name and download link are required".to_string(),
        ));
    };

    let entry = state
        .store
        .create(NewApp {
            name,
            icon: payload.icon,
            download_link,
        })
        .map_err(|err| ApiError::storage("Failed to add app", err))?;

    info!("Added app '{}' (id {})", entry.name, entry.id);
    Ok(Json(entry))
}

pub async fn delete_app(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_admin(&state, &jar)?;

    state
        .store
        .delete(&id)
        .map_err(|err| ApiError::storage("Failed to delete app", err))?;

    info!("Deleted app id {id}");
    Ok(Json(SuccessResponse::ok()))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if username != state.config.admin_username || password != state.config.admin_password {
        warn!("Rejected login with invalid credentials");
        return Err(ApiError::InvalidCredentials);
    }

    let session = state.sessions.create();
    info!("Admin session created");

    let mut cookie = Cookie::new(SESSION_COOKIE, session.token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.config.secure_cookies);

    Ok((jar.add(cookie), Json(SuccessResponse::ok())))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");

    (jar.remove(removal), Json(SuccessResponse::ok()))
}

pub async fn check_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Json<AuthStatus> {
    Json(AuthStatus {
        is_admin: session_is_admin(&state, &jar),
    })
}

fn session_is_admin(state: &AppState, jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()))
        .map_or(false, |session| session.is_admin)
}

/// Mutating handlers call this before touching the store, so an
/// unauthenticated attempt never reaches it.
fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), ApiError> {
    if session_is_admin(state, jar) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
