use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{ProjectError, ProjectService};

/// GET /api/projects/:id - Fetch one project with its requests (each
/// expanded with the requesting student and user) and submissions.
/// Any signed-in account may read a project.
pub async fn show(
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = ProjectService::new().await.map_err(fetch_failed)?;

    let project = service
        .fetch_with_relations(id)
        .await
        .map_err(fetch_failed)?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(json!({ "success": true, "project": project })))
}

fn fetch_failed(err: ProjectError) -> ApiError {
    tracing::error!("Error fetching project: {}", err);
    ApiError::internal_server_error("Failed to fetch project")
}
