use axum::extract::{Extension, Path};
use axum::response::Json;
use serde_json::{json, Value};

use crate::database::models::ProfileResponse;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ExperienceInput, ProfileService};

/// POST /profile/experience - Add a new experience entry at the front of the
/// caller's experience list. Creating is its own route; it is never inferred
/// from a sentinel id on the update path.
pub async fn add(
    Extension(auth_user): Extension<AuthUser>,
    Json(input): Json<ExperienceInput>,
) -> ApiResult<ProfileResponse> {
    let service = ProfileService::new();
    let profile = service.add_experience(auth_user.user_id, input).await?;

    Ok(ApiResponse::created(profile))
}

/// PUT /profile/experience/:experience_id - Replace the matching entry in
/// place, preserving its id and position in the sequence
pub async fn replace(
    Extension(auth_user): Extension<AuthUser>,
    Path(experience_id): Path<String>,
    Json(input): Json<ExperienceInput>,
) -> ApiResult<ProfileResponse> {
    let service = ProfileService::new();
    let profile = service
        .replace_experience(auth_user.user_id, &experience_id, input)
        .await?;

    Ok(ApiResponse::success(profile))
}

/// DELETE /profile/experience/:experience_id - Remove the matching entry.
/// An id that matches nothing removes nothing and reports 404.
pub async fn remove(
    Extension(auth_user): Extension<AuthUser>,
    Path(experience_id): Path<String>,
) -> ApiResult<Value> {
    let service = ProfileService::new();
    service
        .remove_experience(auth_user.user_id, &experience_id)
        .await?;

    Ok(ApiResponse::success(json!({ "msg": "Experience removed" })))
}
