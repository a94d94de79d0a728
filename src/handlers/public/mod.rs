// Public handlers: no authentication required. Token acquisition
// (registration, login) and the open profile reads live here.
pub mod auth;
pub mod profile;
pub mod users;
