pub mod auth;
pub mod me;
pub mod portfolio;
pub mod project;
pub mod technology;
