pub mod asset;
pub mod project;
pub mod technology;
pub mod user;
