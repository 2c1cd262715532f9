pub mod admin;
pub mod auth;
pub mod geo;
pub mod prospect;
pub mod reference;
pub mod report;
pub mod user;

pub use admin::{admin_config, health_config};
pub use auth::auth_config;
pub use geo::geo_config;
pub use prospect::prospect_config;
pub use reference::reference_config;
pub use report::report_config;
pub use user::user_config;
