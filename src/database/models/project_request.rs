use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student's request to join a project. `status` holds one of
/// PENDING, APPROVED, or REJECTED.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub student_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
