use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Experience, ExperienceDraft, ProfileRow, ProfileUpdate};

/// Column list shared by every profile query; `p` is the profiles relation
/// (or a CTE over it) and `u` the joined users relation.
const PROFILE_COLUMNS: &str = "p.id, p.user_id, u.name AS user_name, u.avatar AS user_avatar, \
     p.company, p.website, p.location, p.bio, p.status, p.github_username, \
     p.skills, p.social, p.experience, p.created_at";

/// Persistence for profile documents, including the ordered experience
/// sub-collection. Every mutation is a single atomic statement; there is no
/// fetch-then-save anywhere, so concurrent writers cannot lose each other's
/// updates.
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Partial-update upsert. Creates the profile on first write; on update,
    /// optional fields only overwrite when supplied (COALESCE) and social
    /// keys merge into the stored object.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<ProfileRow, DatabaseError> {
        let sql = format!(
            "WITH up AS ( \
                INSERT INTO profiles \
                    (user_id, status, skills, company, website, location, bio, github_username, social) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                ON CONFLICT (user_id) DO UPDATE SET \
                    status = EXCLUDED.status, \
                    skills = EXCLUDED.skills, \
                    company = COALESCE(EXCLUDED.company, profiles.company), \
                    website = COALESCE(EXCLUDED.website, profiles.website), \
                    location = COALESCE(EXCLUDED.location, profiles.location), \
                    bio = COALESCE(EXCLUDED.bio, profiles.bio), \
                    github_username = COALESCE(EXCLUDED.github_username, profiles.github_username), \
                    social = profiles.social || EXCLUDED.social \
                RETURNING * \
             ) \
             SELECT {PROFILE_COLUMNS} FROM up p JOIN users u ON u.id = p.user_id"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(&update.status)
            .bind(&update.skills)
            .bind(&update.company)
            .bind(&update.website)
            .bind(&update.location)
            .bind(&update.bio)
            .bind(&update.github_username)
            .bind(Json(&update.social))
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ProfileRow>, DatabaseError> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p JOIN users u ON u.id = p.user_id \
             WHERE p.user_id = $1"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<ProfileRow>, DatabaseError> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p JOIN users u ON u.id = p.user_id \
             ORDER BY p.created_at"
        );

        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn exists(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Insert a new experience entry at the front of the sequence. The entry
    /// id is assigned here. None means the profile does not exist.
    pub async fn prepend_experience(
        &self,
        user_id: Uuid,
        draft: ExperienceDraft,
    ) -> Result<Option<ProfileRow>, DatabaseError> {
        let entry = Experience::from_draft(Uuid::new_v4(), draft);

        let sql = format!(
            "WITH updated AS ( \
                UPDATE profiles \
                SET experience = jsonb_build_array($2::jsonb) || experience \
                WHERE user_id = $1 \
                RETURNING * \
             ) \
             SELECT {PROFILE_COLUMNS} FROM updated p JOIN users u ON u.id = p.user_id"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(Json(&entry))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Replace the entry with the given id in place, preserving its position.
    /// The WHERE containment guard makes an unknown id match zero rows, so a
    /// miss can never disturb the sequence. None means profile or entry absent.
    pub async fn replace_experience(
        &self,
        user_id: Uuid,
        experience_id: Uuid,
        draft: ExperienceDraft,
    ) -> Result<Option<ProfileRow>, DatabaseError> {
        let entry = Experience::from_draft(experience_id, draft);

        let sql = format!(
            "WITH updated AS ( \
                UPDATE profiles \
                SET experience = ( \
                    SELECT jsonb_agg(CASE WHEN elem->>'id' = $2 THEN $3::jsonb ELSE elem END ORDER BY ord) \
                    FROM jsonb_array_elements(profiles.experience) WITH ORDINALITY AS t(elem, ord) \
                ) \
                WHERE user_id = $1 \
                  AND experience @> jsonb_build_array(jsonb_build_object('id', $2::text)) \
                RETURNING * \
             ) \
             SELECT {PROFILE_COLUMNS} FROM updated p JOIN users u ON u.id = p.user_id"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(experience_id.to_string())
            .bind(Json(&entry))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Remove exactly the entry with the given id. Guarded the same way as
    /// replace_experience: an unknown id is a no-op reported as None, never a
    /// removal at some other position.
    pub async fn remove_experience(
        &self,
        user_id: Uuid,
        experience_id: Uuid,
    ) -> Result<Option<ProfileRow>, DatabaseError> {
        let sql = format!(
            "WITH updated AS ( \
                UPDATE profiles \
                SET experience = COALESCE(( \
                    SELECT jsonb_agg(elem ORDER BY ord) \
                    FROM jsonb_array_elements(profiles.experience) WITH ORDINALITY AS t(elem, ord) \
                    WHERE elem->>'id' <> $2 \
                ), '[]'::jsonb) \
                WHERE user_id = $1 \
                  AND experience @> jsonb_build_array(jsonb_build_object('id', $2::text)) \
                RETURNING * \
             ) \
             SELECT {PROFILE_COLUMNS} FROM updated p JOIN users u ON u.id = p.user_id"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(experience_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Remove the profile and its owning user in one transaction, so a
    /// partial cascade cannot be observed.
    pub async fn delete_with_user(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
