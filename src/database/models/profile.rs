use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Recognized social network links. Only keys supplied by the client are
/// stored; serialization omits absent keys so an untouched profile reads
/// back as `"social": {}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// One entry of the ordered experience sub-collection, embedded in the
/// profile document. The wire names `from`/`to` are kept from the document
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "from")]
    pub from_date: NaiveDate,
    #[serde(rename = "to", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated experience fields without an identity yet. The repository
/// assigns the id on insertion; replacement reuses the existing id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceDraft {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl Experience {
    pub fn from_draft(id: Uuid, draft: ExperienceDraft) -> Self {
        Self {
            id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            from_date: draft.from_date,
            to_date: draft.to_date,
            current: draft.current,
            description: draft.description,
        }
    }
}

/// Sparse update document for createOrUpdateProfile. `status` and `skills`
/// are always written; None in the optional fields means "leave untouched",
/// and `social` carries only the keys supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

/// Profile row joined with the owning user's name and avatar
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: Json<SocialLinks>,
    pub experience: Json<Vec<Experience>>,
    pub created_at: DateTime<Utc>,
}

/// Owning user summary denormalized into profile responses
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// API shape of a profile
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user: ProfileOwner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user: ProfileOwner {
                id: row.user_id,
                name: row.user_name,
                avatar: row.user_avatar,
            },
            company: row.company,
            website: row.website,
            location: row.location,
            bio: row.bio,
            status: row.status,
            github_username: row.github_username,
            skills: row.skills,
            social: row.social.0,
            experience: row.experience.0,
            created_at: row.created_at,
        }
    }
}
