//! Data access layer (Repository pattern)

pub mod cash;
pub mod role;
pub mod tenant;
pub mod user;

pub use cash::CashRepository;
pub use role::RoleRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
