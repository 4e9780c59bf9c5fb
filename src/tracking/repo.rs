use bson::{doc, oid::ObjectId, Document};
use mongodb::{options::FindOptions, results::InsertOneResult, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::db::collect_all;

/// Append-only log entry. No mutation or deletion path exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub parcel_id: ObjectId,
    pub tracking_id: String,
    pub status: String,
    pub message: String,
    pub updated_by: String,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrackingEvent {
    pub parcel_id: ObjectId,
    pub tracking_id: String,
    pub status: String,
    pub message: String,
    pub updated_by: String,
    pub created_at: bson::DateTime,
}

fn trackings(db: &Database) -> Collection<TrackingEvent> {
    db.collection("trackings")
}

pub async fn insert(db: &Database, event: &NewTrackingEvent) -> anyhow::Result<InsertOneResult> {
    let result = db
        .collection::<NewTrackingEvent>("trackings")
        .insert_one(event, None)
        .await?;
    Ok(result)
}

/// Creation order, ascending; this ordering is the query contract.
pub fn log_order() -> Document {
    doc! { "createdAt": 1 }
}

pub async fn list_by_parcel(
    db: &Database,
    parcel_id: ObjectId,
) -> anyhow::Result<Vec<TrackingEvent>> {
    let options = FindOptions::builder().sort(log_order()).build();
    let cursor = trackings(db)
        .find(doc! { "parcelId": parcel_id }, options)
        .await?;
    collect_all(cursor).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_reads_back_in_creation_order() {
        let order = log_order();
        assert_eq!(order.len(), 1);
        assert_eq!(order.get_i32("createdAt").unwrap(), 1);
    }
}
