use crate::api::models::HistoryResponse;
use crate::api::routes::AppState;
use crate::period::Period;
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::collections::HashMap;
use tracing::warn;

pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<HistoryResponse> {
    let period = Period::parse(params.get("period").map(String::as_str).unwrap_or("today"));

    match state.source.history(period).await {
        Ok(series) => Json(HistoryResponse::from_series(series, &state.tariff)),
        Err(e) => {
            warn!(period = period.as_str(), "history query failed: {e}");
            Json(HistoryResponse::unavailable(e.to_string()))
        }
    }
}
