pub mod manager;
pub mod models;
pub mod profile_repository;
pub mod user_repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use profile_repository::ProfileRepository;
pub use user_repository::UserRepository;
