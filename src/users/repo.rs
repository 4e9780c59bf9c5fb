use bson::{doc, oid::ObjectId, Document};
use mongodb::{
    options::FindOptions,
    results::{InsertOneResult, UpdateResult},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use crate::db::collect_all;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Rider,
    Admin,
}

/// Account record in the user directory. Source of truth for role checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_logged_in: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_logged_in: Option<String>,
}

fn users(db: &Database) -> Collection<User> {
    db.collection("users")
}

/// Emails key the user directory; every lookup and write runs through the
/// same normalization so a mixed-case sign-in resolves to one record.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_filter(email: &str) -> Document {
    doc! { "email": normalize_email(email) }
}

pub async fn find_by_email(db: &Database, email: &str) -> anyhow::Result<Option<User>> {
    let user = users(db).find_one(email_filter(email), None).await?;
    Ok(user)
}

pub async fn insert(db: &Database, user: &NewUser) -> anyhow::Result<InsertOneResult> {
    let result = db
        .collection::<NewUser>("users")
        .insert_one(user, None)
        .await?;
    Ok(result)
}

pub async fn touch_last_logged_in(
    db: &Database,
    email: &str,
    last_logged_in: Option<&str>,
) -> anyhow::Result<UpdateResult> {
    let result = users(db)
        .update_one(
            email_filter(email),
            doc! { "$set": { "lastLoggedIn": last_logged_in } },
            None,
        )
        .await?;
    Ok(result)
}

/// Case-insensitive substring search over email and name, capped at 10 rows.
pub async fn search(db: &Database, query: &str) -> anyhow::Result<Vec<User>> {
    let filter = doc! {
        "$or": [
            { "email": { "$regex": query, "$options": "i" } },
            { "name": { "$regex": query, "$options": "i" } },
        ]
    };
    let options = FindOptions::builder().limit(10).build();
    let cursor = users(db).find(filter, options).await?;
    collect_all(cursor).await
}

pub async fn set_role(db: &Database, id: ObjectId, role: Role) -> anyhow::Result<UpdateResult> {
    let role = bson::to_bson(&role)?;
    let result = users(db)
        .update_one(doc! { "_id": id }, doc! { "$set": { "role": role } }, None)
        .await?;
    Ok(result)
}

/// Second write of the rider-approval pair. Not atomic with the rider update;
/// partial failure leaves the two records diverged (accepted trade-off).
pub async fn promote_to_rider(db: &Database, email: &str) -> anyhow::Result<UpdateResult> {
    let result = users(db)
        .update_one(email_filter(email), doc! { "$set": { "role": "rider" } }, None)
        .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&Role::Rider).unwrap(), r#""rider""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn lookups_normalize_mixed_case_emails() {
        assert_eq!(normalize_email("  U@X.com "), "u@x.com");

        // A record stored by the lowercasing upsert must be found again no
        // matter how the caller cases the email.
        let filter = email_filter("Rider@X.com");
        assert_eq!(filter.get_str("email").unwrap(), "rider@x.com");
        assert_eq!(
            filter.get_str("email").unwrap(),
            normalize_email("rider@x.com")
        );
    }

    #[test]
    fn user_without_role_defaults_to_user() {
        let raw = doc! { "_id": ObjectId::new(), "email": "u@x.com" };
        let user: User = bson::from_document(raw).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.name.is_none());
    }
}
