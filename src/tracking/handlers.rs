use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::dto::{
    AppendTrackingRequest, AppendTrackingResponse, ParcelSummary, TrackingEventResponse,
    TrackingLogResponse,
};
use super::repo::{self, NewTrackingEvent};
use crate::error::ApiError;
use crate::parcels::repo as parcels_repo;
use crate::state::AppState;

/// Appending requires resolving the tracking id to an existing parcel first.
#[instrument(skip(state, payload))]
pub async fn append_event(
    State(state): State<AppState>,
    Json(payload): Json<AppendTrackingRequest>,
) -> Result<(StatusCode, Json<AppendTrackingResponse>), ApiError> {
    if payload.tracking_id.is_empty() {
        return Err(ApiError::Validation("trackingId is required".into()));
    }

    let parcel = parcels_repo::find_by_tracking_id(&state.db, &payload.tracking_id)
        .await?
        .ok_or(ApiError::NotFound("Parcel not found"))?;

    let event = NewTrackingEvent {
        parcel_id: parcel.id,
        tracking_id: payload.tracking_id,
        status: payload.status,
        message: payload.message,
        updated_by: payload.updated_by.unwrap_or_else(|| "System".into()),
        created_at: bson::DateTime::now(),
    };
    let result = repo::insert(&state.db, &event).await?;
    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    info!(parcel_id = %parcel.id, tracking_id = %event.tracking_id, "tracking event appended");
    Ok((
        StatusCode::CREATED,
        Json(AppendTrackingResponse {
            message: "Tracking log added successfully".into(),
            inserted_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_tracking_log(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> Result<Json<TrackingLogResponse>, ApiError> {
    let parcel = parcels_repo::find_by_tracking_id(&state.db, &tracking_id)
        .await?
        .ok_or(ApiError::NotFound("Parcel not found"))?;

    let events = repo::list_by_parcel(&state.db, parcel.id).await?;

    Ok(Json(TrackingLogResponse {
        tracking_id,
        parcel_info: ParcelSummary::from(parcel),
        tracking_logs: events.into_iter().map(TrackingEventResponse::from).collect(),
    }))
}
