// Protected handlers: the JWT middleware has already validated the token and
// injected AuthUser, so every handler here trusts its user id.
pub mod auth;
pub mod experience;
pub mod profile;
