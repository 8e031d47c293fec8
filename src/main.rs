/// Service entry point
use nasa_explorer::clients::{EonetClient, HomeClient, HttpClient, MarsClient, NeoClient};
use nasa_explorer::config::AppConfig;
use nasa_explorer::handlers::AppState;
use nasa_explorer::routes::build_router;
use nasa_explorer::services::{AsteroidTracker, HomeService, MarsService, WildfireService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize clients
    let http = HttpClient::new(Duration::from_secs(config.http_timeout_seconds))?;
    let neo_client = NeoClient::new(http.clone(), config.nasa_backend_url.clone());
    let eonet_client = EonetClient::new(http.clone(), config.nasa_backend_url.clone());
    let home_client = HomeClient::new(http.clone(), config.nasa_backend_url.clone());
    let mars_client = MarsClient::new(http, config.mars_backend_url.clone());

    // Initialize services
    let state = AppState {
        tracker: Arc::new(AsteroidTracker::new(Arc::new(neo_client))),
        wildfires: Arc::new(WildfireService::new(Arc::new(eonet_client))),
        home: Arc::new(HomeService::new(Arc::new(home_client))),
        mars: Arc::new(MarsService::new(
            Arc::new(mars_client),
            config.mars.default_sol,
            config.mars.photo_limit,
        )),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("nasa_explorer listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
