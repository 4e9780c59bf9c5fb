use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::verifier::Principal;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo as users_repo;
use crate::users::repo::Role;

/// Extracts the bearer credential, runs it through the identity verifier and
/// yields the verified principal. Rejects before any handler body executes.
#[derive(Debug)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated("Missing Authorization header"))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthenticated("Invalid Authorization header"))?;

        let principal = state.verifier.verify(token).await.map_err(|e| {
            warn!(error = %e, "token verification failed");
            ApiError::Forbidden("Forbidden Access")
        })?;

        Ok(AuthUser(principal))
    }
}

async fn require_role(state: &AppState, principal: &Principal, role: Role) -> Result<(), ApiError> {
    let user = users_repo::find_by_email(&state.db, &principal.email).await?;
    match user {
        Some(u) if u.role == role => Ok(()),
        _ => {
            warn!(email = %principal.email, required = ?role, "role check failed");
            Err(ApiError::Forbidden("Forbidden Access"))
        }
    }
}

/// `AuthUser` plus an admin role check against the user directory.
pub struct AdminUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        require_role(state, &principal, Role::Admin).await?;
        Ok(AdminUser(principal))
    }
}

/// `AuthUser` plus a rider role check against the user directory.
pub struct RiderUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for RiderUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        require_role(state, &principal, Role::Rider).await?;
        Ok(RiderUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::test_support::sign_token;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/parcels");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(..)));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(..)));
    }

    #[tokio::test]
    async fn bad_token_is_forbidden() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer not-a-jwt"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(..)));
    }

    #[tokio::test]
    async fn valid_token_yields_the_principal() {
        let state = AppState::fake();
        let token = sign_token(&state.config.jwt, "u@x.com");
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AuthUser(principal) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("extract principal");
        assert_eq!(principal.email, "u@x.com");
    }
}
