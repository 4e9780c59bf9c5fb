mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tracking", post(handlers::append_event))
        .route("/tracking/:trackingId", get(handlers::get_tracking_log))
}
