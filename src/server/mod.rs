mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::location::{BatchEvaluator, Gazetteer};
pub use state::AppState;

pub fn build_router(gazetteer: Gazetteer, evaluator: BatchEvaluator) -> Router {
    let state = Arc::new(AppState { gazetteer, evaluator });

    Router::new()
        .route("/api/extract", get(handlers::extract_label))
        .route("/api/evaluate", post(handlers::evaluate_batch))
        .route("/api/gazetteer", get(handlers::gazetteer_summary))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, gazetteer: Gazetteer, evaluator: BatchEvaluator) -> std::io::Result<()> {
    let app = build_router(gazetteer, evaluator);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("SafeGround server listening on http://{}", addr);
    axum::serve(listener, app).await
}
