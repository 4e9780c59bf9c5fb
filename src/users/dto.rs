use serde::{Deserialize, Serialize};

use super::repo::{Role, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub email: String,
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub last_logged_in: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserResponse {
    pub message: String,
    pub inserted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_logged_in: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email,
            name: user.name,
            role: user.role,
            last_logged_in: user.last_logged_in,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn user_response_uses_hex_id() {
        let id = ObjectId::new();
        let response = UserResponse::from(User {
            id,
            email: "u@x.com".into(),
            name: None,
            role: Role::Admin,
            last_logged_in: None,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["role"], "admin");
        assert!(json.get("name").is_none());
    }
}
