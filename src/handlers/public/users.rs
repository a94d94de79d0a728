use axum::response::Json;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{RegisterInput, UserService};

/// POST /users - Register a new user account
///
/// Validates the payload, rejects duplicate emails, stores the bcrypt-hashed
/// credential with a Gravatar-derived avatar, and returns a signed token so
/// the client is authenticated immediately after registration.
pub async fn register(Json(input): Json<RegisterInput>) -> ApiResult<Value> {
    let service = UserService::new();
    let user = service.register(input).await?;

    let token = generate_jwt(Claims::new(user.id))?;

    Ok(ApiResponse::created(json!({ "token": token })))
}
