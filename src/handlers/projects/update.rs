use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::UpdateProjectFields;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{ProjectError, ProjectService};

/// PUT /api/projects/:id - Edit a project's name, description, or
/// enrollment cap. Only the fields present in the body are applied.
///
/// The faculty gate runs in middleware; ownership is checked here
/// against the project's created_by column.
pub async fn update(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(fields): Json<UpdateProjectFields>,
) -> Result<Json<Value>, ApiError> {
    let service = ProjectService::new().await.map_err(update_failed)?;

    // Verify the project exists and belongs to this faculty member
    let existing = service
        .fetch(id)
        .await
        .map_err(update_failed)?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if existing.created_by != user.id {
        tracing::warn!(
            "Faculty user {} attempted to edit project {} owned by {}",
            user.id,
            id,
            existing.created_by
        );
        return Err(ApiError::forbidden("Access denied - Not your project"));
    }

    match service.update_fields(id, &fields).await {
        Ok(_) => {}
        Err(ProjectError::NotFound(_)) => {
            return Err(ApiError::not_found("Project not found"));
        }
        Err(e) => return Err(update_failed(e)),
    }

    let project = service
        .fetch_with_relations(id)
        .await
        .map_err(update_failed)?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(json!({ "success": true, "project": project })))
}

fn update_failed(err: ProjectError) -> ApiError {
    tracing::error!("Error updating project: {}", err);
    ApiError::internal_server_error("Failed to update project")
}
