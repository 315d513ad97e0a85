use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Flat role attribute on a user. Exactly one role per user; role membership
/// is the sole authorization signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Partner,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Partner => "partner",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "partner" => Some(Role::Partner),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub uid: Uuid,
    pub email: String,
    pub fullname: String,
    pub role: String,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New unverified account with the default role.
    pub fn new(fullname: &str, email: &str, password_hash: &str) -> Self {
        let now = Utc::now();
        Self {
            uid: Uuid::new_v4(),
            email: email.to_string(),
            fullname: fullname.to_string(),
            role: Role::User.as_str().to_string(),
            is_verified: false,
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
