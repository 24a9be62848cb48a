use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Student profile row, linked 1:1 to a users row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}
