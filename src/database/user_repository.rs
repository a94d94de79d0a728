use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{User, UserWithPassword};

const USER_COLUMNS: &str = "id, name, email, avatar, created_at";

/// Persistence for user records. Every call is a single statement, attempted
/// exactly once.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        avatar: &str,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (name, email, password, avatar) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(avatar)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_with_password_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, DatabaseError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, password, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
