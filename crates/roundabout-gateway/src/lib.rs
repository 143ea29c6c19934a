//! HTTP surface of the redirect ring.
//!
//! The router serves the admin JSON API under `/admin` and intercepts any
//! request carrying `?on=<shortcode>` to redirect it to the next entry of the
//! ring.

pub mod app;
pub mod error;
pub mod ghost;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
