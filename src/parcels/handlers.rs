use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use tracing::{info, instrument};

use super::dto::{
    AssignRiderRequest, CreateParcelRequest, CreateParcelResponse, DashboardStats,
    ParcelListQuery, ParcelResponse, RiderEmailQuery, UpdateDeliveryStatusRequest,
    WithdrawRequest,
};
use super::repo::{self, NewParcel};
use crate::auth::extractors::{AuthUser, RiderUser};
use crate::db::{DeleteSummary, UpdateSummary};
use crate::error::ApiError;
use crate::state::AppState;

fn parse_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::Validation(format!("invalid parcel id: {id}")))
}

/// Fallback when the client does not supply a tracking id; same lowercase hex
/// as every other exposed id.
fn fallback_tracking_id(id: ObjectId) -> String {
    format!("TRK-{}", id.to_hex())
}

#[instrument(skip(state))]
pub async fn list_parcels(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Query(params): Query<ParcelListQuery>,
) -> Result<Json<Vec<ParcelResponse>>, ApiError> {
    let filter = repo::list_filter(
        params.email.as_deref(),
        params.payment_status,
        params.delivery_status,
    );
    let parcels = repo::list(&state.db, filter).await?;
    Ok(Json(parcels.into_iter().map(ParcelResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_parcel(
    State(state): State<AppState>,
    Json(payload): Json<CreateParcelRequest>,
) -> Result<(StatusCode, Json<CreateParcelResponse>), ApiError> {
    if payload.sender_name.is_empty() || payload.receiver_name.is_empty() {
        return Err(ApiError::Validation(
            "senderName and receiverName are required".into(),
        ));
    }
    if payload.email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }

    let id = ObjectId::new();
    let tracking_id = payload
        .tracking_id
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_tracking_id(id));

    let parcel = NewParcel {
        id,
        sender_name: payload.sender_name,
        receiver_name: payload.receiver_name,
        parcel_name: payload.parcel_name,
        email: payload.email,
        payment_status: payload.payment_status,
        delivery_status: payload.delivery_status,
        tracking_id: tracking_id.clone(),
        created_at: bson::DateTime::now(),
    };
    repo::insert(&state.db, &parcel).await?;

    info!(parcel_id = %id, %tracking_id, "parcel created");
    Ok((
        StatusCode::CREATED,
        Json(CreateParcelResponse {
            inserted_id: id.to_hex(),
            tracking_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParcelResponse>, ApiError> {
    let id = parse_id(&id)?;
    let parcel = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Parcel not found"))?;
    Ok(Json(ParcelResponse::from(parcel)))
}

#[instrument(skip(state))]
pub async fn delete_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let id = parse_id(&id)?;
    let result = repo::delete(&state.db, id).await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Parcel not found"));
    }
    info!(parcel_id = %id, "parcel deleted");
    Ok(Json(result.into()))
}

/// No guard against re-assigning an already assigned parcel; the last write
/// wins.
#[instrument(skip(state, payload))]
pub async fn assign_rider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRiderRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let id = parse_id(&id)?;
    let rider_id = ObjectId::parse_str(&payload.rider_id)
        .map_err(|_| ApiError::Validation(format!("invalid rider id: {}", payload.rider_id)))?;

    let result = repo::assign_rider(&state.db, id, rider_id, &payload.rider_email).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Parcel not found"));
    }

    info!(parcel_id = %id, rider_email = %payload.rider_email, "rider assigned");
    Ok(Json(result.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_delivery_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDeliveryStatusRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let id = parse_id(&id)?;
    let result = repo::update_delivery_status(&state.db, id, payload.new_status).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Parcel not found"));
    }

    info!(parcel_id = %id, new_status = payload.new_status.as_str(), "delivery status updated");
    Ok(Json(result.into()))
}

#[instrument(skip(state))]
pub async fn rider_parcels_by_email(
    State(state): State<AppState>,
    RiderUser(_rider): RiderUser,
    Query(params): Query<RiderEmailQuery>,
) -> Result<Json<Vec<ParcelResponse>>, ApiError> {
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing email query parameter".into()))?;

    let parcels = repo::list_active_by_rider(&state.db, &email).await?;
    Ok(Json(parcels.into_iter().map(ParcelResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn completed_deliveries(
    State(state): State<AppState>,
    RiderUser(_rider): RiderUser,
    Query(params): Query<RiderEmailQuery>,
) -> Result<Json<Vec<ParcelResponse>>, ApiError> {
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing email query parameter".into()))?;

    let parcels = repo::list_completed_by_rider(&state.db, &email).await?;
    Ok(Json(parcels.into_iter().map(ParcelResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn withdraw_earnings(
    State(state): State<AppState>,
    Json(payload): Json<WithdrawRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing rider email".into()))?;

    let result = repo::withdraw_earnings(&state.db, &email).await?;
    info!(rider_email = %email, withdrawn = result.modified_count, "earnings withdrawn");
    Ok(Json(result.into()))
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = repo::dashboard_stats(&state.db).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tracking_ids_use_lowercase_hex() {
        let id = ObjectId::new();
        let tracking_id = fallback_tracking_id(id);
        assert_eq!(tracking_id, format!("TRK-{}", id.to_hex()));
        assert!(!tracking_id[4..].chars().any(|c| c.is_ascii_uppercase()));
    }
}
