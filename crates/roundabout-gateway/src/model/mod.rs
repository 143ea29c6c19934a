mod redirect;

pub use redirect::{CreateRedirectRequest, RedirectResponse, RepairResponse, SwapRequest};

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
