use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{ExperienceDraft, ProfileResponse, ProfileUpdate, SocialLinks};
use crate::database::ProfileRepository;

/// Profile create/update payload. Skills arrive as one comma-separated
/// string and social links as flat keys.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    pub status: Option<String>,
    pub skills: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Experience payload; dates are `YYYY-MM-DD` strings parsed at the boundary
#[derive(Debug, Default, Deserialize)]
pub struct ExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Validation failed")]
    Validation(HashMap<String, String>),
    #[error("There is no profile for this user")]
    ProfileNotFound,
    #[error("Experience entry not found")]
    ExperienceNotFound,
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// The profile-document update protocol: boundary validation, the
/// partial-update upsert, and ordered experience editing. All storage calls
/// go through ProfileRepository's single-statement operations, and input is
/// validated before the pool is ever touched.
pub struct ProfileService;

impl ProfileService {
    pub fn new() -> Self {
        Self
    }

    async fn repository(&self) -> Result<ProfileRepository, ProfileError> {
        let pool = DatabaseManager::pool().await?;
        Ok(ProfileRepository::new(pool))
    }

    /// Create the caller's profile or partially update it in place
    pub async fn create_or_update(
        &self,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<ProfileResponse, ProfileError> {
        let update = build_update(input)?;
        let row = self.repository().await?.upsert(user_id, &update).await?;
        Ok(row.into())
    }

    pub async fn get_own(&self, user_id: Uuid) -> Result<ProfileResponse, ProfileError> {
        self.repository()
            .await?
            .find_by_user(user_id)
            .await?
            .map(ProfileResponse::from)
            .ok_or(ProfileError::ProfileNotFound)
    }

    pub async fn list(&self) -> Result<Vec<ProfileResponse>, ProfileError> {
        let rows = self.repository().await?.list_all().await?;
        Ok(rows.into_iter().map(ProfileResponse::from).collect())
    }

    /// Look up a profile by the owning user's id, taken raw from the path.
    /// A malformed id is a distinct client error, not a lookup miss.
    pub async fn get_by_user_id(&self, raw_user_id: &str) -> Result<ProfileResponse, ProfileError> {
        let user_id = parse_identifier(raw_user_id)?;
        self.repository()
            .await?
            .find_by_user(user_id)
            .await?
            .map(ProfileResponse::from)
            .ok_or(ProfileError::ProfileNotFound)
    }

    /// Remove the caller's profile and account in one transaction
    pub async fn delete_with_user(&self, user_id: Uuid) -> Result<(), ProfileError> {
        self.repository().await?.delete_with_user(user_id).await?;
        Ok(())
    }

    /// Insert a new experience entry at the front of the sequence
    pub async fn add_experience(
        &self,
        user_id: Uuid,
        input: ExperienceInput,
    ) -> Result<ProfileResponse, ProfileError> {
        let draft = build_experience_draft(input)?;

        self.repository()
            .await?
            .prepend_experience(user_id, draft)
            .await?
            .map(ProfileResponse::from)
            .ok_or(ProfileError::ProfileNotFound)
    }

    /// Replace an existing entry in place, keeping its id and position
    pub async fn replace_experience(
        &self,
        user_id: Uuid,
        raw_experience_id: &str,
        input: ExperienceInput,
    ) -> Result<ProfileResponse, ProfileError> {
        let experience_id = parse_identifier(raw_experience_id)?;
        let draft = build_experience_draft(input)?;

        let repository = self.repository().await?;
        let row = repository
            .replace_experience(user_id, experience_id, draft)
            .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(missing_experience_error(&repository, user_id).await?),
        }
    }

    /// Remove exactly one entry by id; an unknown id removes nothing
    pub async fn remove_experience(
        &self,
        user_id: Uuid,
        raw_experience_id: &str,
    ) -> Result<(), ProfileError> {
        let experience_id = parse_identifier(raw_experience_id)?;

        let repository = self.repository().await?;
        let row = repository.remove_experience(user_id, experience_id).await?;

        match row {
            Some(_) => Ok(()),
            None => Err(missing_experience_error(&repository, user_id).await?),
        }
    }
}

/// A zero-row experience mutation means either the profile or the entry is
/// missing; report which one
async fn missing_experience_error(
    repository: &ProfileRepository,
    user_id: Uuid,
) -> Result<ProfileError, ProfileError> {
    if repository.exists(user_id).await? {
        Ok(ProfileError::ExperienceNotFound)
    } else {
        Ok(ProfileError::ProfileNotFound)
    }
}

fn parse_identifier(raw: &str) -> Result<Uuid, ProfileError> {
    Uuid::parse_str(raw).map_err(|_| ProfileError::InvalidIdentifier(raw.to_string()))
}

/// Split a comma-separated skills string into trimmed entries, preserving
/// order. Tokens are not filtered, matching the stored document format.
fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',').map(|skill| skill.trim().to_string()).collect()
}

/// Treat empty and whitespace-only strings as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Validate the profile payload and assemble the sparse update document.
/// `status` and `skills` are mandatory; everything else passes through only
/// when supplied.
fn build_update(input: ProfileInput) -> Result<ProfileUpdate, ProfileError> {
    let mut field_errors = HashMap::new();

    let status = input.status.as_deref().map(str::trim).unwrap_or("");
    if status.is_empty() {
        field_errors.insert("status".to_string(), "Status is required".to_string());
    }

    let skills = input.skills.as_deref().map(str::trim).unwrap_or("");
    if skills.is_empty() {
        field_errors.insert("skills".to_string(), "Skills is required".to_string());
    }

    if !field_errors.is_empty() {
        return Err(ProfileError::Validation(field_errors));
    }

    Ok(ProfileUpdate {
        status: status.to_string(),
        skills: parse_skills(skills),
        company: non_empty(input.company),
        website: non_empty(input.website),
        location: non_empty(input.location),
        bio: non_empty(input.bio),
        github_username: non_empty(input.github_username),
        social: SocialLinks {
            youtube: non_empty(input.youtube),
            twitter: non_empty(input.twitter),
            facebook: non_empty(input.facebook),
            linkedin: non_empty(input.linkedin),
            instagram: non_empty(input.instagram),
        },
    })
}

/// Validate an experience payload and parse its dates
fn build_experience_draft(input: ExperienceInput) -> Result<ExperienceDraft, ProfileError> {
    let mut field_errors = HashMap::new();

    let title = input.title.as_deref().map(str::trim).unwrap_or("");
    if title.is_empty() {
        field_errors.insert("title".to_string(), "Title is required".to_string());
    }

    let company = input.company.as_deref().map(str::trim).unwrap_or("");
    if company.is_empty() {
        field_errors.insert("company".to_string(), "Company is required".to_string());
    }

    let from_date = match input.from.as_deref().map(str::trim) {
        None | Some("") => {
            field_errors.insert("from".to_string(), "From date is required".to_string());
            None
        }
        Some(raw) => match parse_date(raw) {
            Ok(date) => Some(date),
            Err(message) => {
                field_errors.insert("from".to_string(), message);
                None
            }
        },
    };

    let to_date = match input.to.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_date(raw) {
            Ok(date) => Some(date),
            Err(message) => {
                field_errors.insert("to".to_string(), message);
                None
            }
        },
    };

    match from_date {
        Some(from_date) if field_errors.is_empty() => Ok(ExperienceDraft {
            title: title.to_string(),
            company: company.to_string(),
            location: non_empty(input.location),
            from_date,
            to_date,
            current: input.current,
            description: non_empty(input.description),
        }),
        _ => Err(ProfileError::Validation(field_errors)),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Dates must use the YYYY-MM-DD format".to_string())
}
