//! # Users
//!
//! Users are keyed by email. Registration is idempotent: a second insert for
//! the same email answers with a sentinel instead of an error.

use crate::error::{StoreError, StoreResult};
use crate::outcome::InsertOutcome;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// The only role the backend recognises
pub const ADMIN_ROLE: &str = "admin";

/// Message returned when registering an email that is already known
pub const USER_EXISTS_MESSAGE: &str = "User Already Exist";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unique business key
    pub email: String,

    /// Unset for regular customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            email: email.into(),
            role: None,
            extra: Map::new(),
        }
    }

    /// Builder: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Answer to a registration request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserCreation {
    Created(InsertOutcome),
    AlreadyExists {
        message: &'static str,
        #[serde(rename = "insertedId")]
        inserted_id: Option<String>,
    },
}

impl UserCreation {
    fn already_exists() -> Self {
        UserCreation::AlreadyExists {
            message: USER_EXISTS_MESSAGE,
            inserted_id: None,
        }
    }
}

/// Response for `GET /users/admin/{email}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// Insert a user unless one with the same email exists.
///
/// The existence check and the insert are separate store calls. A store that
/// enforces email uniqueness reports the losing side of a race as
/// [`StoreError::Duplicate`], which is folded into the same sentinel.
pub async fn register(store: &dyn Store, mut user: User) -> StoreResult<UserCreation> {
    if store.find_user_by_email(&user.email).await?.is_some() {
        info!("User {} already registered", user.email);
        return Ok(UserCreation::already_exists());
    }

    user.id = None;
    match store.insert_user(user).await {
        Ok(outcome) => Ok(UserCreation::Created(outcome)),
        Err(StoreError::Duplicate(_)) => Ok(UserCreation::already_exists()),
        Err(err) => Err(err),
    }
}

/// Whether the user with this email holds the admin role
pub async fn admin_status(store: &dyn Store, email: &str) -> StoreResult<AdminStatus> {
    let admin = store
        .find_user_by_email(email)
        .await?
        .map(|user| user.is_admin())
        .unwrap_or(false);
    Ok(AdminStatus { admin })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_register_is_idempotent_by_email() {
        let store = MemoryStore::new();

        let first = register(&store, User::new("ana@bistro.io")).await.unwrap();
        assert!(matches!(first, UserCreation::Created(ref o) if o.inserted_id.is_some()));

        let second = register(&store, User::new("ana@bistro.io").with_name("Ana"))
            .await
            .unwrap();
        let json = serde_json::to_value(&second).unwrap();
        assert_eq!(json["message"], "User Already Exist");
        assert!(json["insertedId"].is_null());

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_status() {
        let store = MemoryStore::new();
        store
            .insert_user(User::new("boss@bistro.io").with_role(ADMIN_ROLE))
            .await
            .unwrap();
        store.insert_user(User::new("guest@bistro.io")).await.unwrap();

        assert!(admin_status(&store, "boss@bistro.io").await.unwrap().admin);
        assert!(!admin_status(&store, "guest@bistro.io").await.unwrap().admin);
        assert!(!admin_status(&store, "nobody@bistro.io").await.unwrap().admin);
    }
}
