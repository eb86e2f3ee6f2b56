pub mod auth;
pub mod jobs;
pub mod messages;
pub mod reviews;
pub mod tasks;
pub mod users;
