use axum::extract::Extension;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;

/// GET /auth - Return the authenticated user's record (password hash never
/// leaves the service layer)
pub async fn current_user(Extension(auth_user): Extension<AuthUser>) -> ApiResult<User> {
    let service = UserService::new();
    let user = service.current_user(auth_user.user_id).await?;

    Ok(ApiResponse::success(user))
}
