use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::TrackingEvent;
use crate::parcels::repo::{DeliveryStatus, Parcel, PaymentStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendTrackingRequest {
    pub tracking_id: String,
    pub status: String,
    pub message: String,
    pub updated_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendTrackingResponse {
    pub message: String,
    pub inserted_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_name: Option<String>,
    pub sender_name: String,
    pub receiver_name: String,
    pub delivery_status: DeliveryStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Parcel> for ParcelSummary {
    fn from(p: Parcel) -> Self {
        Self {
            parcel_name: p.parcel_name,
            sender_name: p.sender_name,
            receiver_name: p.receiver_name,
            delivery_status: p.delivery_status,
            payment_status: p.payment_status,
            created_at: p.created_at.to_time_0_3(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEventResponse {
    pub status: String,
    pub message: String,
    pub updated_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<TrackingEvent> for TrackingEventResponse {
    fn from(e: TrackingEvent) -> Self {
        Self {
            status: e.status,
            message: e.message,
            updated_by: e.updated_by,
            created_at: e.created_at.to_time_0_3(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingLogResponse {
    pub tracking_id: String,
    pub parcel_info: ParcelSummary,
    pub tracking_logs: Vec<TrackingEventResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_request_defaults_updated_by_to_none() {
        let body = r#"{"trackingId":"TRK-1","status":"picked_up","message":"collected"}"#;
        let request: AppendTrackingRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.tracking_id, "TRK-1");
        assert!(request.updated_by.is_none());
    }
}
