use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub enrollment_cap: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a project. `enrollment_cap` defaults to 1 when
/// omitted.
#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub enrollment_cap: Option<i32>,
}

/// Editable fields of an existing project. A field left absent in the
/// request body stays untouched; only the fields present are written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub enrollment_cap: Option<i32>,
}

impl UpdateProjectFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.enrollment_cap.is_none()
    }
}
