//! Minimal catalog web service: a public JSON listing of apps plus a
//! cookie-session admin surface for adding and deleting entries. The two
//! static client pages are served by the same process; persistence sits
//! behind a swappable record-store trait with SQLite and flat-file JSON
//! backends.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;
pub mod store;
pub mod types;

use handlers::{check_auth, create_app, delete_app, list_apps, login, logout};
use state::AppState;

/// Assembles the full application: the JSON API under `/api` and the static
/// client pages as the fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let static_pages = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/apps", get(list_apps).post(create_app))
        .route("/api/apps/:id", delete(delete_app))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/check-auth", get(check_auth))
        .fallback_service(static_pages)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let address = state.config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!("Server running on http://{address}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Dropping the state closes the store handle (the SQLite connection for
    // the relational backend).
    info!("Server stopped, closing store");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
