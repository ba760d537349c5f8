//! Inbound webhook from the companion app.
//!
//! The app POSTs one JSON object per sync; top-level keys are canonical
//! metric identifiers, values are metric-specific records. The envelope is
//! validated hard (empty or malformed bodies get a 400 and the sink is never
//! touched), but individual keys fail soft: however many keys resolve to a
//! handler, a structurally valid payload always gets `200 Data received`.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new().route("/hook/health", post(receive_hook))
}

#[derive(Debug)]
pub enum HookError {
    EmptyPayload,
    InvalidJson,
}

impl IntoResponse for HookError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HookError::EmptyPayload => (StatusCode::BAD_REQUEST, "Empty payload"),
            HookError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON"),
        };
        (status, body).into_response()
    }
}

pub async fn receive_hook(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, &'static str), HookError> {
    if body.trim().is_empty() {
        tracing::warn!("webhook called with an empty body");
        return Err(HookError::EmptyPayload);
    }

    let data: Value = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "webhook received a non-JSON payload");
        HookError::InvalidJson
    })?;

    // Records only ever arrive as an object keyed by metric.
    let Some(records) = data.as_object() else {
        tracing::warn!("webhook payload is not a JSON object");
        return Err(HookError::InvalidJson);
    };

    let summary = shared::dispatch::dispatch(&state.config, records, state.sink.as_ref()).await;
    tracing::info!(
        applied = summary.applied,
        unknown = summary.unknown,
        disabled = summary.disabled,
        failed = summary.failed,
        "processed webhook payload"
    );

    Ok((StatusCode::OK, "Data received"))
}
