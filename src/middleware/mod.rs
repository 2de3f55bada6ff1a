pub mod auth;
pub mod extract;
