use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::Payment;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount_in_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub user_email: String,
    pub parcel_id: String,
    pub amount: i64,
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentResponse {
    pub message: String,
    pub payment_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub user_email: String,
    pub parcel_id: String,
    pub amount: i64,
    pub transaction_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub paid_at: OffsetDateTime,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.to_hex(),
            user_email: p.user_email,
            parcel_id: p.parcel_id.to_hex(),
            amount: p.amount,
            transaction_id: p.transaction_id,
            paid_at: p.paid_at.to_time_0_3(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn payment_response_uses_hex_ids_and_rfc3339() {
        let parcel_id = ObjectId::new();
        let response = PaymentResponse::from(Payment {
            id: ObjectId::new(),
            user_email: "u@x.com".into(),
            parcel_id,
            amount: 1500,
            transaction_id: "tx_1".into(),
            paid_at: bson::DateTime::now(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["parcelId"], parcel_id.to_hex());
        assert_eq!(json["amount"], 1500);
        assert!(json["paidAt"].as_str().unwrap().contains('T'));
    }
}
