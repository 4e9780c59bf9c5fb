use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::{OperationalStatus, Rider, RiderStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderApplication {
    pub name: String,
    pub email: String,
    pub district: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderCreatedResponse {
    pub message: String,
    pub inserted_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: RiderStatus,
    pub current_status: OperationalStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Rider> for RiderResponse {
    fn from(r: Rider) -> Self {
        Self {
            id: r.id.to_hex(),
            name: r.name,
            email: r.email,
            district: r.district,
            phone: r.phone,
            status: r.status,
            current_status: r.current_status,
            created_at: r.created_at.to_time_0_3(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewStatusRequest {
    pub status: RiderStatus,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_request_parses_the_approval_shape() {
        let body = r#"{"status":"approved","email":"r@x.com"}"#;
        let request: NewStatusRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.status, RiderStatus::Approved);
        assert_eq!(request.email.as_deref(), Some("r@x.com"));
    }

    #[test]
    fn unknown_status_is_rejected_at_the_boundary() {
        let body = r#"{"status":"retired"}"#;
        assert!(serde_json::from_str::<NewStatusRequest>(body).is_err());
    }
}
