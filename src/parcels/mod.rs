mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/parcels",
            get(handlers::list_parcels).post(handlers::create_parcel),
        )
        .route(
            "/parcels/:id",
            get(handlers::get_parcel).delete(handlers::delete_parcel),
        )
        .route("/parcels/:id/assign-rider", patch(handlers::assign_rider))
        .route(
            "/parcels/:id/update-delivery-status",
            patch(handlers::update_delivery_status),
        )
        .route(
            "/rider-parcels-by-email",
            get(handlers::rider_parcels_by_email),
        )
        .route("/completed-deliveries", get(handlers::completed_deliveries))
        .route("/withdraw-earnings", patch(handlers::withdraw_earnings))
        .route("/parcels-dashboard-stats", get(handlers::dashboard_stats))
}
