use axum::extract::Extension;
use axum::response::Json;
use serde_json::{json, Value};

use crate::database::models::ProfileResponse;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ProfileInput, ProfileService};

/// GET /profile/me - The caller's own profile, owner fields resolved
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> ApiResult<ProfileResponse> {
    let service = ProfileService::new();
    let profile = service.get_own(auth_user.user_id).await?;

    Ok(ApiResponse::success(profile))
}

/// POST /profile - Create the caller's profile, or partially update it if it
/// already exists. The user id comes from the verified token, never from the
/// body.
pub async fn create_or_update(
    Extension(auth_user): Extension<AuthUser>,
    Json(input): Json<ProfileInput>,
) -> ApiResult<ProfileResponse> {
    let service = ProfileService::new();
    let profile = service.create_or_update(auth_user.user_id, input).await?;

    Ok(ApiResponse::success(profile))
}

/// DELETE /profile - Remove the caller's profile and account
pub async fn delete(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let service = ProfileService::new();
    service.delete_with_user(auth_user.user_id).await?;

    Ok(ApiResponse::success(json!({ "msg": "User deleted" })))
}
