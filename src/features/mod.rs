pub mod admin;
pub mod auth;
pub mod backup;
pub mod categories;
pub mod tasks;
pub mod users;
