use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use tracing::{error, info, instrument};

use super::dto::{
    DistrictQuery, NewStatusRequest, RiderApplication, RiderCreatedResponse, RiderResponse,
};
use super::repo::{self, NewRider, OperationalStatus, RiderStatus};
use crate::auth::extractors::AdminUser;
use crate::db::UpdateSummary;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo as users_repo;

fn parse_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::Validation(format!("invalid rider id: {id}")))
}

#[instrument(skip(state, payload))]
pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<RiderApplication>,
) -> Result<(StatusCode, Json<RiderCreatedResponse>), ApiError> {
    if payload.email.is_empty() || payload.district.is_empty() {
        return Err(ApiError::Validation("email and district are required".into()));
    }

    let rider = NewRider {
        name: payload.name,
        email: payload.email,
        district: payload.district,
        phone: payload.phone,
        status: RiderStatus::Pending,
        current_status: OperationalStatus::Free,
        created_at: bson::DateTime::now(),
    };
    let result = repo::insert(&state.db, &rider).await?;
    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    info!(email = %rider.email, %inserted_id, "rider application submitted");
    Ok((
        StatusCode::CREATED,
        Json(RiderCreatedResponse {
            message: "Rider application submitted".into(),
            inserted_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn pending_riders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<RiderResponse>>, ApiError> {
    let riders = repo::list_by_status(&state.db, RiderStatus::Pending, None).await?;
    Ok(Json(riders.into_iter().map(RiderResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn active_riders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<DistrictQuery>,
) -> Result<Json<Vec<RiderResponse>>, ApiError> {
    let riders = repo::list_by_status(
        &state.db,
        RiderStatus::Approved,
        params.district.as_deref(),
    )
    .await?;
    Ok(Json(riders.into_iter().map(RiderResponse::from).collect()))
}

/// Approval cascades a role promotion in the user directory. The two writes
/// are not transactional; a failed promotion is logged and surfaced, leaving
/// the rider approved with the role unchanged.
#[instrument(skip(state, payload))]
pub async fn new_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewStatusRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let id = parse_id(&id)?;

    let result = repo::set_status(&state.db, id, payload.status).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Rider not found"));
    }

    if payload.status == RiderStatus::Approved {
        let email = match payload.email {
            Some(ref email) if !email.is_empty() => email.clone(),
            _ => match repo::find_by_id(&state.db, id).await? {
                Some(rider) => rider.email,
                None => String::new(),
            },
        };
        if email.is_empty() {
            error!(rider_id = %id, "approved rider has no email; role promotion skipped");
        } else {
            let promoted = users_repo::promote_to_rider(&state.db, &email).await?;
            if promoted.matched_count == 0 {
                error!(rider_id = %id, %email, "role promotion matched no user");
            }
        }
    }

    info!(rider_id = %id, status = payload.status.as_str(), "rider status updated");
    Ok(Json(result.into()))
}

#[instrument(skip(state))]
pub async fn set_busy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let id = parse_id(&id)?;
    let result = repo::set_busy(&state.db, id).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Rider not found"));
    }
    Ok(Json(result.into()))
}
