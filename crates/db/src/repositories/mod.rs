pub mod asset_repo;
pub mod project_repo;
pub mod technology_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use project_repo::ProjectRepo;
pub use technology_repo::TechnologyRepo;
pub use user_repo::UserRepo;
