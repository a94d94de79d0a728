pub mod profile;
pub mod user;

pub use profile::{
    Experience, ExperienceDraft, ProfileOwner, ProfileResponse, ProfileRow, ProfileUpdate,
    SocialLinks,
};
pub use user::{User, UserWithPassword};
