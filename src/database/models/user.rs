use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account roles recognized by the authorization checks. Stored as text
/// in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Faculty,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Faculty => "FACULTY",
            Role::Student => "STUDENT",
        }
    }
}

impl User {
    pub fn is_faculty(&self) -> bool {
        self.role == Role::Faculty.as_str()
    }
}
