use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use muralmap_core::{FeatureCollection, PipelineConfig, scrape_feature_collection};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PipelineConfig>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_mural_data", get(mural_data_handler))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Each request runs a full scrape. When the wiki cannot be reached the body
/// is still a valid, empty FeatureCollection.
async fn mural_data_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<FeatureCollection>) {
    let config = PipelineConfig::clone(&state.config);
    match scrape_feature_collection(config).await {
        Ok(collection) => {
            info!(features = collection.features.len(), "Served mural data");
            (StatusCode::OK, Json(collection))
        }
        Err(e) => {
            error!("Scrape failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(FeatureCollection::empty()))
        }
    }
}
