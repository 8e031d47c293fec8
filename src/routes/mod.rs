/// Application routes configuration
use crate::handlers::{
    chat, filter_neo, get_apod, health, list_wildfires, mars_photos, neo_chart, neo_detail,
    neo_state, query_neo, refresh_wildfires, wildfire_months, wildfire_regions, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Asteroid tracker
        .route("/neo/query", get(query_neo))
        .route("/neo/filter", get(filter_neo))
        .route("/neo/state", get(neo_state))
        .route("/neo/chart", get(neo_chart))
        .route("/neo/:id", get(neo_detail))
        // Wildfire map
        .route("/wildfires", get(list_wildfires))
        .route("/wildfires/refresh", get(refresh_wildfires))
        .route("/wildfires/months", get(wildfire_months))
        .route("/wildfires/regions", get(wildfire_regions))
        // Home and gallery
        .route("/apod", get(get_apod))
        .route("/chat", post(chat))
        .route("/mars/photos", get(mars_photos))
        .with_state(state)
}
