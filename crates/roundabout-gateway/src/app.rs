use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::ghost::ghost_redirect;
use crate::handlers::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler, health_handler,
    list_redirects_handler, move_down_handler, move_up_handler, not_found_handler,
    record_link_handler, repair_handler, swap_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/records/{record_id}", get(record_link_handler))
            .nest(
                "/admin",
                Router::new()
                    .route(
                        "/redirects",
                        get(list_redirects_handler).post(create_redirect_handler),
                    )
                    .route("/redirects/swap", post(swap_handler))
                    .route(
                        "/redirects/{id}",
                        get(get_redirect_handler).delete(delete_redirect_handler),
                    )
                    .route("/redirects/{id}/move-up", post(move_up_handler))
                    .route("/redirects/{id}/move-down", post(move_down_handler))
                    .route("/repair", post(repair_handler)),
            )
            .fallback(not_found_handler)
            .layer(middleware::from_fn_with_state(state.clone(), ghost_redirect))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
