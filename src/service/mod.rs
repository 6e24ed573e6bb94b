//! Business logic layer

pub mod auth;
pub mod cash;
pub mod rbac;
pub mod tenant;

pub use auth::{AuthService, LoginResponse, UserProfile};
pub use cash::{CashService, CashSummary};
pub use rbac::{PermissionInfo, RbacService};
pub use tenant::TenantService;
