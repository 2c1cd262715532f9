pub mod auth_service;
pub mod prospect_service;
pub mod reference_service;
pub mod report_service;
pub mod user_service;

pub use auth_service::*;
pub use prospect_service::*;
pub use reference_service::*;
pub use report_service::*;
pub use user_service::*;

use crate::error::{AppError, AppResult};
use crate::models::CurrentUser;

pub(crate) fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}
