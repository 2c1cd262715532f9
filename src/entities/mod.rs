pub mod ad_codes;
pub mod healthcare_services;
pub mod lead_sources;
pub mod profiles;
pub mod prospects;
pub mod rejection_reasons;

pub use ad_codes as ad_code_entity;
pub use healthcare_services as service_entity;
pub use lead_sources as lead_source_entity;
pub use profiles as profile_entity;
pub use profiles::UserRole;
pub use prospects as prospect_entity;
pub use prospects::{FacilityType, ProspectStatus};
pub use rejection_reasons as rejection_reason_entity;
