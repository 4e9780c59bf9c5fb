use bson::{doc, oid::ObjectId, Document};
use mongodb::{
    results::{InsertOneResult, UpdateResult},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use crate::db::collect_all;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RiderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiderStatus::Pending => "pending",
            RiderStatus::Approved => "approved",
            RiderStatus::Rejected => "rejected",
        }
    }
}

/// Operational flag, independent of the approval workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    #[default]
    Free,
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: RiderStatus,
    #[serde(default)]
    pub current_status: OperationalStatus,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRider {
    pub name: String,
    pub email: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: RiderStatus,
    pub current_status: OperationalStatus,
    pub created_at: bson::DateTime,
}

fn riders(db: &Database) -> Collection<Rider> {
    db.collection("riders")
}

pub async fn insert(db: &Database, rider: &NewRider) -> anyhow::Result<InsertOneResult> {
    let result = db
        .collection::<NewRider>("riders")
        .insert_one(rider, None)
        .await?;
    Ok(result)
}

pub async fn find_by_id(db: &Database, id: ObjectId) -> anyhow::Result<Option<Rider>> {
    let rider = riders(db).find_one(doc! { "_id": id }, None).await?;
    Ok(rider)
}

pub fn status_filter(status: RiderStatus, district: Option<&str>) -> Document {
    let mut filter = doc! { "status": status.as_str() };
    if let Some(district) = district {
        filter.insert("district", district);
    }
    filter
}

pub async fn list_by_status(
    db: &Database,
    status: RiderStatus,
    district: Option<&str>,
) -> anyhow::Result<Vec<Rider>> {
    let cursor = riders(db).find(status_filter(status, district), None).await?;
    collect_all(cursor).await
}

pub async fn set_status(
    db: &Database,
    id: ObjectId,
    status: RiderStatus,
) -> anyhow::Result<UpdateResult> {
    let result = riders(db)
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "status": status.as_str() } },
            None,
        )
        .await?;
    Ok(result)
}

pub async fn set_busy(db: &Database, id: ObjectId) -> anyhow::Result<UpdateResult> {
    let result = riders(db)
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "currentStatus": "busy" } },
            None,
        )
        .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_includes_district_only_when_present() {
        let plain = status_filter(RiderStatus::Approved, None);
        assert_eq!(plain.get_str("status").unwrap(), "approved");
        assert!(plain.get("district").is_none());

        let scoped = status_filter(RiderStatus::Approved, Some("Dhaka"));
        assert_eq!(scoped.get_str("district").unwrap(), "Dhaka");
    }

    #[test]
    fn rider_defaults_apply_when_fields_are_absent() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "R",
            "email": "r@x.com",
            "district": "Dhaka",
            "createdAt": bson::DateTime::now(),
        };
        let rider: Rider = bson::from_document(raw).unwrap();
        assert_eq!(rider.status, RiderStatus::Pending);
        assert_eq!(rider.current_status, OperationalStatus::Free);
    }
}
