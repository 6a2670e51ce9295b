pub mod content;
pub mod survey;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::pipeline::filter_chain_middleware;
use crate::state::AppState;

/// Assemble the gateway router: public root/health plus the protected API
/// routes behind the filter chain.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/content",
            get(content::content_list).post(content::content_create),
        )
        .route("/api/content/:id", get(content::content_read))
        .route("/api/survey/answers", post(survey::answer_create))
        .layer(middleware::from_fn_with_state(state.clone(), filter_chain_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Healum API (Rust)",
            "version": version,
            "description": "HTTP gateway fronting the platform's RPC services",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "content": "/api/content[/:id] (protected)",
                "survey": "/api/survey/answers (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "registered_types": {
                "content": state.content.len(),
                "surveys": state.surveys.len(),
            }
        }
    }))
}
