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
        .route("/users", post(handlers::upsert_user))
        .route("/users/search", get(handlers::search_users))
        .route("/users/role", get(handlers::get_user_role))
        .route("/users/:id", patch(handlers::set_user_role))
}
