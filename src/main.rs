use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bubble_feed::api::{create_router, AppState};
use bubble_feed::config::Config;
use bubble_feed::services::load_catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let catalog = load_catalog(config.catalog_path.as_deref())?;

    tracing::info!(
        max_videos = config.max_videos,
        min_profiling_videos = config.min_profiling_videos,
        min_engagement_total = config.min_engagement_total,
        dwell_threshold_ms = config.dwell_threshold_ms,
        session_idle_timeout_secs = config.session_idle_timeout_secs,
        catalog_items = catalog.len(),
        "Starting bubble-feed v{}",
        env!("CARGO_PKG_VERSION")
    );

    let idle_timeout = config.session_idle_timeout();
    let state = AppState::new(catalog, config.feed_settings()).with_idle_timeout(idle_timeout);
    state.spawn_eviction(idle_timeout / 4);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
