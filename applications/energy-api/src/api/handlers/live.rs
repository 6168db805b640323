use crate::api::models::LiveResponse;
use crate::api::routes::AppState;
use axum::{extract::State, response::Json};
use tracing::warn;

pub async fn get_live(State(state): State<AppState>) -> Json<LiveResponse> {
    match state.source.live().await {
        Ok(snap) => Json(LiveResponse::from_snapshot(snap, &state.tariff)),
        Err(e) => {
            warn!("live query failed: {e}");
            Json(LiveResponse::unavailable(e.to_string()))
        }
    }
}
