use crate::api::handlers::{dashboard, health, history, live};
use crate::config::Tariff;
use crate::source::EnergySource;
use axum::{extract::Request, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn EnergySource>,
    pub tariff: Tariff,
}

pub fn create_router(source: Arc<dyn EnergySource>, tariff: Tariff) -> Router {
    let state = AppState { source, tariff };

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/health", get(health::health))
        .route("/api/live", get(live::get_live))
        .route("/api/history", get(history::get_history))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(
                    |_response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::INFO, latency = ?latency, "request completed");
                    },
                ),
        )
}
