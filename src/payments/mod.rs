mod dto;
pub mod handlers;
pub mod processor;
pub mod repo;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route(
            "/payments",
            post(handlers::record_payment).get(handlers::list_payments),
        )
}
