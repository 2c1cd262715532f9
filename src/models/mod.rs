pub mod common;
pub mod pagination;
pub mod prospect;
pub mod reference;
pub mod report;
pub mod user;

pub use common::*;
pub use pagination::*;
pub use prospect::*;
pub use reference::*;
pub use report::*;
pub use user::*;
