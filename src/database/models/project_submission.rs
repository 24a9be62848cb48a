use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Work a student submitted against a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectSubmission {
    pub id: Uuid,
    pub project_id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub content_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
