use axum::{extract::Extension, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::models::NewProject;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{ProjectError, ProjectService};

/// POST /api/projects - Create a project owned by the caller.
pub async fn create(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }
    if let Some(cap) = payload.enrollment_cap {
        if cap < 1 {
            return Err(ApiError::bad_request("enrollment_cap must be at least 1"));
        }
    }

    let service = ProjectService::new().await.map_err(create_failed)?;

    let project = service.create(user.id, payload).await.map_err(create_failed)?;
    tracing::info!("Faculty user {} created project {}", user.id, project.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "project": project })),
    ))
}

fn create_failed(err: ProjectError) -> ApiError {
    tracing::error!("Error creating project: {}", err);
    ApiError::internal_server_error("Failed to create project")
}
