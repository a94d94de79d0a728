use axum::extract::Path;

use crate::database::models::ProfileResponse;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProfileService;

/// GET /profile - List all profiles with owner name and avatar resolved.
/// An empty list is a valid result, not an error.
pub async fn list() -> ApiResult<Vec<ProfileResponse>> {
    let service = ProfileService::new();
    let profiles = service.list().await?;

    Ok(ApiResponse::success(profiles))
}

/// GET /profile/user/:user_id - Fetch one profile by the owning user's id.
///
/// The id is taken as a raw string so a malformed value maps to a 400
/// INVALID_IDENTIFIER, distinct from a well-formed id with no profile (404).
pub async fn by_user(Path(user_id): Path<String>) -> ApiResult<ProfileResponse> {
    let service = ProfileService::new();
    let profile = service.get_by_user_id(&user_id).await?;

    Ok(ApiResponse::success(profile))
}
