use crate::error::Result;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roundabout_core::{RecordId, RingError};

/// Public link of a content record: redirects to the paired entry's target.
pub async fn record_link_handler(
    Path(record_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response> {
    let record_id = RecordId(record_id);
    let target = state
        .ring()
        .target_for_record(record_id)
        .await?
        .ok_or_else(|| RingError::NotFound(format!("no redirect for record {record_id}")))?;

    Ok((StatusCode::FOUND, [(LOCATION, target)]).into_response())
}
