//! Redirects for public ghost URLs.
//!
//! Any request carrying `on=<shortcode>` in its query string is answered with
//! a `302 Found` pointing at the target of the entry that follows the
//! shortcode in the ring. When the shortcode cannot be resolved the request
//! continues to the router untouched.

use axum::extract::{Query, Request, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use roundabout_core::shortcode::GHOST_PARAM;
use roundabout_core::RingError;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn ghost_redirect(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(code) = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(GHOST_PARAM))
    else {
        return next.run(request).await;
    };

    match state.ring().resolve_next(&code).await {
        Ok(target) => {
            debug!(code = %code, target = %target, "redirecting");
            (StatusCode::FOUND, [(LOCATION, target)]).into_response()
        }
        Err(RingError::NotFound(_) | RingError::EmptyRing) => {
            debug!(code = %code, "no redirect for shortcode");
            next.run(request).await
        }
        Err(e) => {
            warn!(code = %code, error = %e, "failed to resolve redirect");
            next.run(request).await
        }
    }
}
