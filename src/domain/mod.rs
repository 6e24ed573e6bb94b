//! Domain models for YachtCash Core

pub mod cash;
pub mod common;
pub mod rbac;
pub mod tenant;
pub mod user;

pub use cash::*;
pub use common::StringUuid;
pub use rbac::*;
pub use tenant::*;
pub use user::*;
