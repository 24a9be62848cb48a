use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller resolved from the x-user-id header against the
/// users table. Injected as a request extension.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware for routes any signed-in account may call. Rejects with
/// 401 when the header is absent and 403 when it does not resolve to a
/// user row.
pub async fn require_user(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_user(&headers)
        .await?
        .ok_or_else(|| ApiError::forbidden("Access denied"))?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Middleware for faculty-only routes. An id that does not resolve falls
/// into the same 403 as a non-faculty role, matching the single gate the
/// endpoints expose.
pub async fn require_faculty(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match resolve_user(&headers).await? {
        Some(user) if user.is_faculty() => user,
        Some(user) => {
            tracing::warn!(
                "Rejected non-faculty caller {} ({}) on faculty route",
                user.id,
                user.role
            );
            return Err(ApiError::forbidden("Access denied - Faculty only"));
        }
        None => return Err(ApiError::forbidden("Access denied - Faculty only")),
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Look up the caller from the x-user-id header. A missing header is a
/// 401; a malformed or unknown id resolves to Ok(None) so each gate can
/// pick its own 403 message.
async fn resolve_user(headers: &HeaderMap) -> Result<Option<User>, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::unauthorized("User not authenticated"))?;

    let raw = match raw.to_str() {
        Ok(s) if !s.trim().is_empty() => s.trim(),
        _ => return Err(ApiError::unauthorized("User not authenticated")),
    };

    let user_id = match Uuid::parse_str(raw) {
        Ok(id) => id,
        Err(_) => {
            tracing::debug!("x-user-id header is not a UUID: {}", raw);
            return Ok(None);
        }
    };

    let pool = DatabaseManager::pool().await?;
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, role, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Database error resolving user {}: {}", user_id, e);
        ApiError::internal_server_error("Failed to resolve user")
    })?;

    Ok(user)
}
