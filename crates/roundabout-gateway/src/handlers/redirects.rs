use crate::error::Result;
use crate::model::{CreateRedirectRequest, RedirectResponse, RepairResponse, SwapRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roundabout_core::EntryId;

fn respond(state: &AppState, entry: roundabout_core::Entry) -> RedirectResponse {
    let ghost_url = state.ghost_url_of(&entry);
    RedirectResponse::new(entry, ghost_url)
}

pub async fn list_redirects_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RedirectResponse>>> {
    let entries = state.ring().list().await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| respond(&state, entry))
            .collect(),
    ))
}

pub async fn create_redirect_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateRedirectRequest>,
) -> Result<(StatusCode, Json<RedirectResponse>)> {
    let entry = state
        .ring()
        .create(&request.shortcode, &request.target_url)
        .await?;
    Ok((StatusCode::CREATED, Json(respond(&state, entry))))
}

pub async fn get_redirect_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<RedirectResponse>> {
    let entry = state.ring().get_by_id(EntryId(id)).await?;
    Ok(Json(respond(&state, entry)))
}

pub async fn delete_redirect_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<RedirectResponse>> {
    let entry = state.ring().delete(EntryId(id)).await?;
    Ok(Json(respond(&state, entry)))
}

pub async fn move_up_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    state.ring().move_up(EntryId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_down_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    state.ring().move_down(EntryId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn swap_handler(
    State(state): State<AppState>,
    Json(request): Json<SwapRequest>,
) -> Result<StatusCode> {
    state.ring().swap(request.a, request.b).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn repair_handler(State(state): State<AppState>) -> Result<Json<RepairResponse>> {
    let repaired = state.ring().repair().await?;
    Ok(Json(RepairResponse { repaired }))
}
