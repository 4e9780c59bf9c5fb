use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Error taxonomy shared by every handler. Collaborator failures (store,
/// verifier, payment processor) all surface as `Upstream` with no retry.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(..) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(..) => StatusCode::FORBIDDEN,
            ApiError::NotFound(..) => StatusCode::NOT_FOUND,
            ApiError::Validation(..) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Unauthenticated("missing Authorization header").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("Forbidden Access").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("User not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation("email is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream(anyhow::anyhow!("store down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_carries_the_message() {
        let err = ApiError::NotFound("User not found");
        let body = ErrorBody {
            message: err.to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"User not found"}"#);
    }
}
