use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign claims with the configured secret
pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    encode_with_secret(claims, secret)
}

/// Validate a token against the configured secret and extract claims
pub fn verify_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    decode_with_secret(token, secret)
}

pub fn encode_with_secret(claims: Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let token = encode_with_secret(claims, "test-secret").unwrap();
        let decoded = decode_with_secret(&token, "test-secret").unwrap();

        assert_eq!(decoded.user_id, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let token = encode_with_secret(claims, "test-secret").unwrap();
        assert!(decode_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };

        let token = encode_with_secret(claims, "test-secret").unwrap();
        assert!(decode_with_secret(&token, "test-secret").is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        assert!(matches!(
            encode_with_secret(claims, ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}
