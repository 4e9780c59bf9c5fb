use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use super::dto::{
    CreateIntentRequest, CreateIntentResponse, PaymentListQuery, PaymentResponse,
    RecordPaymentRequest, RecordPaymentResponse,
};
use super::repo::{self, NewPayment};
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::parcels::repo as parcels_repo;
use crate::state::AppState;

#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    if payload.amount_in_cents <= 0 {
        return Err(ApiError::Validation("amountInCents must be positive".into()));
    }

    let client_secret = state
        .payments
        .create_intent(payload.amount_in_cents, "usd")
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(CreateIntentResponse { client_secret }))
}

/// Flips the parcel to paid, then appends the payment record. The two writes
/// are sequential and separately committed; a crash in between leaves a paid
/// parcel without a payment record.
#[instrument(skip(state, payload))]
pub async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<RecordPaymentResponse>), ApiError> {
    let parcel_id = ObjectId::parse_str(&payload.parcel_id)
        .map_err(|_| ApiError::Validation(format!("invalid parcel id: {}", payload.parcel_id)))?;

    let flipped = parcels_repo::mark_paid(&state.db, parcel_id).await?;
    if flipped.modified_count == 0 {
        warn!(%parcel_id, "payment for unknown or already paid parcel");
        return Err(ApiError::NotFound("parcel not found"));
    }

    let payment = NewPayment {
        user_email: payload.user_email,
        parcel_id,
        amount: payload.amount,
        transaction_id: payload.transaction_id,
        paid_at: bson::DateTime::now(),
    };
    let result = repo::insert(&state.db, &payment).await?;
    let payment_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    info!(%parcel_id, %payment_id, amount = payment.amount, "payment recorded");
    Ok((
        StatusCode::CREATED,
        Json(RecordPaymentResponse {
            message: "Payment record saved".into(),
            payment_id,
        }),
    ))
}

/// Owner-match: callers may only list their own payment history.
#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(params): Query<PaymentListQuery>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Email query parameter is required".into()))?;

    if principal.email != email {
        warn!(principal = %principal.email, requested = %email, "payment list owner mismatch");
        return Err(ApiError::Forbidden("Forbidden Access"));
    }

    let payments = repo::list_by_email(&state.db, &email).await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}
