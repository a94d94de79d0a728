use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::auth::{verify_jwt, Claims};
use crate::error::ApiError;

/// Custom header carrying the signed token
const AUTH_HEADER: &str = "x-auth-token";

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    // Extract JWT from the x-auth-token header
    let token = extract_token_from_headers(&headers).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Validate and decode JWT
    let claims = verify_jwt(&token).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        let api_error = ApiError::unauthorized("Token is not valid");
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok::<_, (StatusCode, Json<serde_json::Value>)>(next.run(request).await)
}

/// Extract the token from the x-auth-token header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let header = headers
        .get(AUTH_HEADER)
        .ok_or_else(|| "No token, authorisation denied".to_string())?;

    let token = header
        .to_str()
        .map_err(|_| "Invalid token header format".to_string())?
        .trim();

    if token.is_empty() {
        return Err("No token, authorisation denied".to_string());
    }

    Ok(token.to_string())
}
