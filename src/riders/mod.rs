mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/riders", post(handlers::apply))
        .route("/pending-riders", get(handlers::pending_riders))
        .route("/active-riders", get(handlers::active_riders))
        .route("/riders/:id/newStatus", patch(handlers::new_status))
        .route("/riders/:id/set-busy", patch(handlers::set_busy))
}
