use bson::{doc, oid::ObjectId, Document};
use mongodb::{
    options::FindOptions,
    results::{DeleteResult, InsertOneResult, UpdateResult},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::dto::DashboardStats;
use crate::db::collect_all;

/// Delivery lifecycle: not_collected → rider_assigned → in_transit →
/// {delivered, service_center_delivered}. Writes do not validate that a
/// transition moves forward; callers may set any of the five states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    NotCollected,
    RiderAssigned,
    InTransit,
    Delivered,
    ServiceCenterDelivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::NotCollected => "not_collected",
            DeliveryStatus::RiderAssigned => "rider_assigned",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::ServiceCenterDelivered => "service_center_delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub sender_name: String,
    pub receiver_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcel_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_rider_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_rider_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_withdrawn: Option<bool>,
    pub tracking_id: String,
    pub created_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<bson::DateTime>,
}

/// Insert shape: the id is pre-generated so the tracking id can be derived
/// from it before the write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParcel {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub sender_name: String,
    pub receiver_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_name: Option<String>,
    pub email: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub tracking_id: String,
    pub created_at: bson::DateTime,
}

fn parcels(db: &Database) -> Collection<Parcel> {
    db.collection("parcels")
}

pub async fn insert(db: &Database, parcel: &NewParcel) -> anyhow::Result<InsertOneResult> {
    let result = db
        .collection::<NewParcel>("parcels")
        .insert_one(parcel, None)
        .await?;
    Ok(result)
}

pub async fn find_by_id(db: &Database, id: ObjectId) -> anyhow::Result<Option<Parcel>> {
    let parcel = parcels(db).find_one(doc! { "_id": id }, None).await?;
    Ok(parcel)
}

pub async fn find_by_tracking_id(
    db: &Database,
    tracking_id: &str,
) -> anyhow::Result<Option<Parcel>> {
    let parcel = parcels(db)
        .find_one(doc! { "trackingId": tracking_id }, None)
        .await?;
    Ok(parcel)
}

/// Builds the list filter from the optional query parameters.
pub fn list_filter(
    email: Option<&str>,
    payment_status: Option<PaymentStatus>,
    delivery_status: Option<DeliveryStatus>,
) -> Document {
    let mut filter = Document::new();
    if let Some(email) = email {
        filter.insert("email", email);
    }
    if let Some(status) = payment_status {
        filter.insert("paymentStatus", status.as_str());
    }
    if let Some(status) = delivery_status {
        filter.insert("deliveryStatus", status.as_str());
    }
    filter
}

pub async fn list(db: &Database, filter: Document) -> anyhow::Result<Vec<Parcel>> {
    let cursor = parcels(db).find(filter, None).await?;
    collect_all(cursor).await
}

pub async fn delete(db: &Database, id: ObjectId) -> anyhow::Result<DeleteResult> {
    let result = parcels(db).delete_one(doc! { "_id": id }, None).await?;
    Ok(result)
}

pub async fn assign_rider(
    db: &Database,
    id: ObjectId,
    rider_id: ObjectId,
    rider_email: &str,
) -> anyhow::Result<UpdateResult> {
    let result = parcels(db)
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "deliveryStatus": DeliveryStatus::RiderAssigned.as_str(),
                "assignedRiderId": rider_id,
                "assignedRiderEmail": rider_email,
            }},
            None,
        )
        .await?;
    Ok(result)
}

/// `$set` document for a delivery-status change. `in_transit` stamps the
/// pickup time; `delivered` stamps the delivery time and resets isWithdrawn.
pub fn delivery_update(new_status: DeliveryStatus, now: bson::DateTime) -> Document {
    let mut fields = doc! { "deliveryStatus": new_status.as_str() };
    if new_status == DeliveryStatus::InTransit {
        fields.insert("pickedUpAt", now);
    }
    if new_status == DeliveryStatus::Delivered {
        fields.insert("deliveredAt", now);
        fields.insert("isWithdrawn", false);
    }
    fields
}

pub async fn update_delivery_status(
    db: &Database,
    id: ObjectId,
    new_status: DeliveryStatus,
) -> anyhow::Result<UpdateResult> {
    let fields = delivery_update(new_status, bson::DateTime::now());
    let result = parcels(db)
        .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
        .await?;
    Ok(result)
}

/// First half of the payment pair: flips paymentStatus before the payment
/// record is written. Not atomic with the insert that follows.
pub async fn mark_paid(db: &Database, id: ObjectId) -> anyhow::Result<UpdateResult> {
    let result = parcels(db)
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "paymentStatus": PaymentStatus::Paid.as_str() } },
            None,
        )
        .await?;
    Ok(result)
}

pub async fn list_active_by_rider(db: &Database, email: &str) -> anyhow::Result<Vec<Parcel>> {
    let filter = doc! {
        "assignedRiderEmail": email,
        "deliveryStatus": { "$in": [
            DeliveryStatus::InTransit.as_str(),
            DeliveryStatus::RiderAssigned.as_str(),
        ]},
    };
    let cursor = parcels(db).find(filter, None).await?;
    collect_all(cursor).await
}

pub async fn list_completed_by_rider(db: &Database, email: &str) -> anyhow::Result<Vec<Parcel>> {
    let filter = doc! {
        "assignedRiderEmail": email,
        "deliveryStatus": { "$in": [
            DeliveryStatus::Delivered.as_str(),
            DeliveryStatus::ServiceCenterDelivered.as_str(),
        ]},
    };
    let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
    let cursor = parcels(db).find(filter, options).await?;
    collect_all(cursor).await
}

/// Bulk withdrawal flip for a rider's completed, not-yet-withdrawn parcels.
pub async fn withdraw_earnings(db: &Database, email: &str) -> anyhow::Result<UpdateResult> {
    let result = parcels(db)
        .update_many(
            doc! {
                "assignedRiderEmail": email,
                "deliveryStatus": { "$in": [
                    DeliveryStatus::Delivered.as_str(),
                    DeliveryStatus::ServiceCenterDelivered.as_str(),
                ]},
                "isWithdrawn": false,
            },
            doc! { "$set": { "isWithdrawn": true } },
            None,
        )
        .await?;
    Ok(result)
}

/// Two independent groupings over the same collection, kept non-cross-tabulated
/// on purpose.
pub async fn dashboard_stats(db: &Database) -> anyhow::Result<DashboardStats> {
    let pipeline = vec![doc! {
        "$facet": {
            "deliveryStatusStats": [
                { "$group": { "_id": "$deliveryStatus", "count": { "$sum": 1 } } },
                { "$project": { "status": "$_id", "count": 1, "_id": 0 } },
            ],
            "paymentStatusStats": [
                { "$group": { "_id": "$paymentStatus", "count": { "$sum": 1 } } },
                { "$project": { "status": "$_id", "count": 1, "_id": 0 } },
            ],
        }
    }];

    let mut cursor = parcels(db).aggregate(pipeline, None).await?;
    if cursor.advance().await? {
        let stats = bson::from_document(cursor.deserialize_current()?)?;
        Ok(stats)
    } else {
        Ok(DashboardStats::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::ServiceCenterDelivered).unwrap(),
            r#""service_center_delivered""#
        );
        let parsed: DeliveryStatus = serde_json::from_str(r#""rider_assigned""#).unwrap();
        assert_eq!(parsed, DeliveryStatus::RiderAssigned);
    }

    #[test]
    fn list_filter_only_carries_supplied_params() {
        let empty = list_filter(None, None, None);
        assert!(empty.is_empty());

        let filter = list_filter(Some("u@x.com"), Some(PaymentStatus::Paid), None);
        assert_eq!(filter.get_str("email").unwrap(), "u@x.com");
        assert_eq!(filter.get_str("paymentStatus").unwrap(), "paid");
        assert!(filter.get("deliveryStatus").is_none());
    }

    #[test]
    fn in_transit_stamps_pickup_time() {
        let now = bson::DateTime::now();
        let update = delivery_update(DeliveryStatus::InTransit, now);
        assert_eq!(update.get_str("deliveryStatus").unwrap(), "in_transit");
        assert_eq!(update.get_datetime("pickedUpAt").unwrap(), &now);
        assert!(update.get("deliveredAt").is_none());
        assert!(update.get("isWithdrawn").is_none());
    }

    #[test]
    fn delivered_stamps_time_and_resets_withdrawn() {
        let now = bson::DateTime::now();
        let update = delivery_update(DeliveryStatus::Delivered, now);
        assert_eq!(update.get_str("deliveryStatus").unwrap(), "delivered");
        assert_eq!(update.get_datetime("deliveredAt").unwrap(), &now);
        assert_eq!(update.get_bool("isWithdrawn").unwrap(), false);
        assert!(update.get("pickedUpAt").is_none());
    }

    #[test]
    fn other_statuses_only_touch_the_status_field() {
        let update = delivery_update(DeliveryStatus::ServiceCenterDelivered, bson::DateTime::now());
        assert_eq!(update.len(), 1);
        assert_eq!(
            update.get_str("deliveryStatus").unwrap(),
            "service_center_delivered"
        );
    }

    #[test]
    fn parcel_defaults_apply_when_fields_are_absent() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "senderName": "A",
            "receiverName": "B",
            "email": "u@x.com",
            "trackingId": "TRK-1",
            "createdAt": bson::DateTime::now(),
        };
        let parcel: Parcel = bson::from_document(raw).unwrap();
        assert_eq!(parcel.delivery_status, DeliveryStatus::NotCollected);
        assert_eq!(parcel.payment_status, PaymentStatus::Unpaid);
        assert!(parcel.is_withdrawn.is_none());
    }
}
