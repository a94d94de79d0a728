use axum::response::Json;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginInput, UserService};

/// POST /auth - Authenticate with email and password, receive a signed token
pub async fn login(Json(input): Json<LoginInput>) -> ApiResult<Value> {
    let service = UserService::new();
    let user = service.authenticate(input).await?;

    let token = generate_jwt(Claims::new(user.id))?;

    Ok(ApiResponse::success(json!({ "token": token })))
}
