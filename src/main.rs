use cinematch_api::api::{create_router, AppState};
use cinematch_api::config::Config;
use cinematch_api::data::DataContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Load catalog and similarity once; falls back to demo data if unavailable
    let data = DataContext::load_or_demo(&config.movies_path, &config.similarity_path);
    let state = AppState::from_config(&config, data);
    let _sweeper = state.sessions.spawn_sweeper();

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
