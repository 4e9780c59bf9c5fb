use bson::{doc, oid::ObjectId, Document};
use mongodb::{options::FindOptions, results::InsertOneResult, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::db::collect_all;

/// Append-only payment record; one per successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_email: String,
    pub parcel_id: ObjectId,
    pub amount: i64,
    pub transaction_id: String,
    pub paid_at: bson::DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub user_email: String,
    pub parcel_id: ObjectId,
    pub amount: i64,
    pub transaction_id: String,
    pub paid_at: bson::DateTime,
}

fn payments(db: &Database) -> Collection<Payment> {
    db.collection("payments")
}

pub async fn insert(db: &Database, payment: &NewPayment) -> anyhow::Result<InsertOneResult> {
    let result = db
        .collection::<NewPayment>("payments")
        .insert_one(payment, None)
        .await?;
    Ok(result)
}

/// Most recent charge first.
pub fn history_order() -> Document {
    doc! { "paidAt": -1 }
}

pub async fn list_by_email(db: &Database, email: &str) -> anyhow::Result<Vec<Payment>> {
    let options = FindOptions::builder().sort(history_order()).build();
    let cursor = payments(db)
        .find(doc! { "userEmail": email }, options)
        .await?;
    collect_all(cursor).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_sorts_newest_payment_first() {
        let order = history_order();
        assert_eq!(order.len(), 1);
        assert_eq!(order.get_i32("paidAt").unwrap(), -1);
    }
}
