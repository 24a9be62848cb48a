use axum::{extract::Path, response::Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::{ProjectError, ProjectService};

/// DELETE /api/projects/:id - Remove a project and everything hanging
/// off it: requests first, then submissions, then the project row, all
/// in one transaction.
///
/// This route carries no caller gate, asymmetric with PUT.
pub async fn delete(Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    let service = ProjectService::new().await.map_err(delete_failed)?;

    service.delete_cascade(id).await.map_err(delete_failed)?;

    Ok(Json(json!({ "success": true })))
}

fn delete_failed(err: ProjectError) -> ApiError {
    tracing::error!("Error deleting project: {}", err);
    ApiError::internal_server_error("Failed to delete project")
}
