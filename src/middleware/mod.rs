//! HTTP middleware for YachtCash Core
//!
//! - Bearer token extractors (`AuthUser`, `OptionalAuth`)
//! - Tenant context resolution and extractors
//! - Request metrics and request ids
//! - Sanitised request spans

pub mod auth;
pub mod metrics;
pub mod tenant;
pub mod trace;

pub use auth::{AuthUser, OptionalAuth};
pub use metrics::ObservabilityLayer;
pub use tenant::{tenant_context_middleware, RequireTenant, TenantContext};
pub use trace::SanitizedMakeSpan;
