pub mod connection;
pub mod connection_requests;
pub mod favorites;
pub mod interactions;
pub mod migrations;
pub mod notifications;
pub mod profiles;
pub mod users;

pub use connection::{DatabaseConfig, get_db_pool};
