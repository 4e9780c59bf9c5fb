use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use tracing::{info, instrument};

use super::dto::{
    RoleQuery, RoleResponse, SearchQuery, SetRoleRequest, UpsertUserRequest, UpsertUserResponse,
    UserResponse,
};
use super::repo::{self, NewUser};
use crate::auth::extractors::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Upsert by email: a known user only gets its lastLoggedIn refreshed.
#[instrument(skip(state, payload))]
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(payload): Json<UpsertUserRequest>,
) -> Result<(StatusCode, Json<UpsertUserResponse>), ApiError> {
    let email = repo::normalize_email(&payload.email);
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }

    if repo::find_by_email(&state.db, &email).await?.is_some() {
        repo::touch_last_logged_in(&state.db, &email, payload.last_logged_in.as_deref()).await?;
        return Ok((
            StatusCode::OK,
            Json(UpsertUserResponse {
                message: "User already exists".into(),
                inserted: false,
                inserted_id: None,
            }),
        ));
    }

    let user = NewUser {
        email: email.clone(),
        name: payload.name,
        role: payload.role,
        last_logged_in: payload.last_logged_in,
    };
    let result = repo::insert(&state.db, &user).await?;
    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    info!(%email, %inserted_id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(UpsertUserResponse {
            message: "User created".into(),
            inserted: true,
            inserted_id: Some(inserted_id),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Query required".into()))?;

    let users = repo::search(&state.db, &query).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn set_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<UpsertUserResponse>, ApiError> {
    let role = payload
        .role
        .ok_or_else(|| ApiError::Validation("Role value is required".into()))?;
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::Validation(format!("invalid user id: {id}")))?;

    let result = repo::set_role(&state.db, id, role).await?;
    if result.modified_count == 0 {
        return Err(ApiError::NotFound("User not found or role unchanged"));
    }

    info!(user_id = %id, new_role = ?role, by = %admin.email, "user role updated");
    Ok(Json(UpsertUserResponse {
        message: "User role updated successfully".into(),
        inserted: false,
        inserted_id: None,
    }))
}

#[instrument(skip(state))]
pub async fn get_user_role(
    State(state): State<AppState>,
    Query(params): Query<RoleQuery>,
) -> Result<Json<RoleResponse>, ApiError> {
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Email query parameter is required".into()))?;

    let user = repo::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(RoleResponse { role: user.role }))
}
