use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::{DeliveryStatus, Parcel, PaymentStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelRequest {
    pub sender_name: String,
    pub receiver_name: String,
    pub parcel_name: Option<String>,
    pub email: String,
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelResponse {
    pub inserted_id: String,
    pub tracking_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelResponse {
    pub id: String,
    pub sender_name: String,
    pub receiver_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_name: Option<String>,
    pub email: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_rider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_rider_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_withdrawn: Option<bool>,
    pub tracking_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub picked_up_at: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivered_at: Option<OffsetDateTime>,
}

impl From<Parcel> for ParcelResponse {
    fn from(p: Parcel) -> Self {
        Self {
            id: p.id.to_hex(),
            sender_name: p.sender_name,
            receiver_name: p.receiver_name,
            parcel_name: p.parcel_name,
            email: p.email,
            payment_status: p.payment_status,
            delivery_status: p.delivery_status,
            assigned_rider_id: p.assigned_rider_id.map(|id| id.to_hex()),
            assigned_rider_email: p.assigned_rider_email,
            is_withdrawn: p.is_withdrawn,
            tracking_id: p.tracking_id,
            created_at: p.created_at.to_time_0_3(),
            picked_up_at: p.picked_up_at.map(|t| t.to_time_0_3()),
            delivered_at: p.delivered_at.map(|t| t.to_time_0_3()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelListQuery {
    pub email: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_status: Option<DeliveryStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRiderRequest {
    pub rider_id: String,
    pub rider_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryStatusRequest {
    pub new_status: DeliveryStatus,
}

#[derive(Debug, Deserialize)]
pub struct RiderEmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(default)]
    pub status: Option<String>,
    pub count: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub delivery_status_stats: Vec<StatusCount>,
    #[serde(default)]
    pub payment_status_stats: Vec<StatusCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn create_request_applies_status_defaults() {
        let body = r#"{"senderName":"A","receiverName":"B","email":"u@x.com"}"#;
        let request: CreateParcelRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.delivery_status, DeliveryStatus::NotCollected);
        assert_eq!(request.payment_status, PaymentStatus::Unpaid);
        assert!(request.parcel_name.is_none());
        assert!(request.tracking_id.is_none());
    }

    #[test]
    fn parcel_response_renders_rfc3339_timestamps() {
        let parcel = Parcel {
            id: ObjectId::new(),
            sender_name: "A".into(),
            receiver_name: "B".into(),
            parcel_name: None,
            email: "u@x.com".into(),
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Delivered,
            assigned_rider_id: None,
            assigned_rider_email: Some("r@x.com".into()),
            is_withdrawn: Some(false),
            tracking_id: "TRK-1".into(),
            created_at: bson::DateTime::now(),
            picked_up_at: None,
            delivered_at: Some(bson::DateTime::now()),
        };
        let json = serde_json::to_value(ParcelResponse::from(parcel)).unwrap();
        assert_eq!(json["deliveryStatus"], "delivered");
        assert_eq!(json["isWithdrawn"], false);
        assert!(json["deliveredAt"].as_str().unwrap().contains('T'));
        assert!(json.get("pickedUpAt").is_none());
    }

    #[test]
    fn dashboard_stats_deserialize_from_a_facet_document() {
        let facet = doc! {
            "deliveryStatusStats": [
                { "status": "delivered", "count": 3 },
                { "status": null, "count": 1 },
            ],
            "paymentStatusStats": [
                { "status": "paid", "count": 4 },
            ],
        };
        let stats: DashboardStats = bson::from_document(facet).unwrap();
        assert_eq!(stats.delivery_status_stats.len(), 2);
        assert_eq!(stats.delivery_status_stats[0].count, 3);
        assert!(stats.delivery_status_stats[1].status.is_none());
        assert_eq!(stats.payment_status_stats[0].status.as_deref(), Some("paid"));
    }
}
