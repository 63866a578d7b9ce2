use anyhow::Result;
use app_catalog::{config::Config, state::AppState};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env();
    let state = AppState::new(config)?;

    app_catalog::serve(state).await
}
