use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqlx::error::DatabaseError as _;
use std::collections::HashMap;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::database::UserRepository;

/// Registration payload. Everything is optional at the boundary so missing
/// fields surface as field errors rather than deserialization failures.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Validation failed")]
    Validation(HashMap<String, String>),
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Registration and credential checks against the user store. Input is
/// validated before the pool is ever touched, so bad requests are rejected
/// even when storage is unreachable.
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    async fn repository(&self) -> Result<UserRepository, UserError> {
        let pool = DatabaseManager::pool().await?;
        Ok(UserRepository::new(pool))
    }

    /// Register a new user: validate, reject duplicate emails, derive the
    /// Gravatar avatar, hash the password, insert.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserError> {
        let (name, email, password) = validate_registration(&input)?;

        let repository = self.repository().await?;
        if repository.email_exists(&email).await? {
            return Err(UserError::AlreadyExists);
        }

        let avatar = gravatar_url(&email);
        let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        match repository
            .insert(&name, &email, &password_hash, &avatar)
            .await
        {
            Ok(user) => Ok(user),
            // Two concurrent registrations can pass the existence check; the
            // unique index settles the race
            Err(DatabaseError::Sqlx(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                Err(UserError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and return the matching user. Unknown email and bad
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, input: LoginInput) -> Result<User, UserError> {
        let (email, password) = validate_login(&input)?;

        let repository = self.repository().await?;
        let Some(user) = repository.find_with_password_by_email(&email).await? else {
            return Err(UserError::InvalidCredentials);
        };

        let matches = bcrypt::verify(&password, &user.password)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }

    pub async fn current_user(&self, user_id: uuid::Uuid) -> Result<User, UserError> {
        self.repository()
            .await?
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}

fn validate_registration(input: &RegisterInput) -> Result<(String, String, String), UserError> {
    let mut field_errors = HashMap::new();

    let name = input.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        field_errors.insert("name".to_string(), "A name is required".to_string());
    }

    let email = input.email.as_deref().map(str::trim).unwrap_or("");
    if !is_valid_email(email) {
        field_errors.insert(
            "email".to_string(),
            "Please fill in a valid email".to_string(),
        );
    }

    let password = input.password.as_deref().unwrap_or("");
    if password.chars().count() < 6 {
        field_errors.insert(
            "password".to_string(),
            "Password must be at least 6 characters".to_string(),
        );
    }

    if !field_errors.is_empty() {
        return Err(UserError::Validation(field_errors));
    }

    Ok((name.to_string(), email.to_string(), password.to_string()))
}

fn validate_login(input: &LoginInput) -> Result<(String, String), UserError> {
    let mut field_errors = HashMap::new();

    let email = input.email.as_deref().map(str::trim).unwrap_or("");
    if !is_valid_email(email) {
        field_errors.insert(
            "email".to_string(),
            "Please include a valid email".to_string(),
        );
    }

    let password = input.password.as_deref().unwrap_or("");
    if password.is_empty() {
        field_errors.insert("password".to_string(), "Password is required".to_string());
    }

    if !field_errors.is_empty() {
        return Err(UserError::Validation(field_errors));
    }

    Ok((email.to_string(), password.to_string()))
}

/// Minimal email shape check: one @, non-empty local part, dotted domain
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }

    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Gravatar URL for an email: 200px, PG-rated, with a generated fallback
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();

    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_all_fields() {
        let err = validate_registration(&RegisterInput::default()).unwrap_err();
        let UserError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields["name"], "A name is required");
        assert_eq!(fields["email"], "Please fill in a valid email");
        assert_eq!(fields["password"], "Password must be at least 6 characters");
    }

    #[test]
    fn registration_rejects_short_password() {
        let input = RegisterInput {
            name: Some("Dev".to_string()),
            email: Some("dev@example.com".to_string()),
            password: Some("12345".to_string()),
        };

        let UserError::Validation(fields) = validate_registration(&input).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn registration_accepts_valid_input() {
        let input = RegisterInput {
            name: Some("  Dev  ".to_string()),
            email: Some("dev@example.com".to_string()),
            password: Some("123456".to_string()),
        };

        let (name, email, password) = validate_registration(&input).unwrap();
        assert_eq!(name, "Dev");
        assert_eq!(email, "dev@example.com");
        assert_eq!(password, "123456");
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("dev@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("dev"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("dev@"));
        assert!(!is_valid_email("dev@example"));
        assert!(!is_valid_email("dev@.example.com"));
        assert!(!is_valid_email("de v@example.com"));
    }

    #[test]
    fn gravatar_url_is_deterministic_and_normalized() {
        let a = gravatar_url("Dev@Example.COM");
        let b = gravatar_url("  dev@example.com ");
        assert_eq!(a, b);

        let hash = a
            .strip_prefix("https://www.gravatar.com/avatar/")
            .and_then(|rest| rest.split('?').next())
            .unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(a.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn different_emails_get_different_avatars() {
        assert_ne!(gravatar_url("a@example.com"), gravatar_url("b@example.com"));
    }
}
