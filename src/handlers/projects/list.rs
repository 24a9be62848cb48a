use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{ProjectError, ProjectService};

/// GET /api/projects - List the caller's own projects, newest first,
/// with request and submission counts.
pub async fn list(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let service = ProjectService::new().await.map_err(list_failed)?;

    let projects = service.list_owned(user.id).await.map_err(list_failed)?;

    Ok(Json(json!({ "success": true, "projects": projects })))
}

fn list_failed(err: ProjectError) -> ApiError {
    tracing::error!("Error listing projects: {}", err);
    ApiError::internal_server_error("Failed to list projects")
}
