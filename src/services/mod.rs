pub mod profile_service;
pub mod user_service;

pub use profile_service::{ExperienceInput, ProfileError, ProfileInput, ProfileService};
pub use user_service::{LoginInput, RegisterInput, UserError, UserService};
