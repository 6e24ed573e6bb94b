//! Application state trait for dependency injection
//!
//! Handlers are generic over [`HasServices`] so that the production
//! `AppState` and in-memory test states share the same router.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::policy::Authorizer;
use crate::repository::{CashRepository, RoleRepository, TenantRepository, UserRepository};
use crate::service::{AuthService, CashService, RbacService, TenantService};

pub trait HasServices: Clone + Send + Sync + 'static {
    type TenantRepo: TenantRepository;
    type UserRepo: UserRepository;
    type RoleRepo: RoleRepository;
    type CashRepo: CashRepository;

    fn config(&self) -> &Config;

    fn tenant_service(&self) -> &TenantService<Self::TenantRepo>;

    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    fn rbac_service(&self) -> &RbacService<Self::RoleRepo>;

    fn cash_service(&self) -> &CashService<Self::CashRepo>;

    fn authorizer(&self) -> &Authorizer<Self::UserRepo, Self::RoleRepo>;

    fn jwt_manager(&self) -> &JwtManager;

    /// Rendered Prometheus metrics, when a recorder is installed
    fn render_metrics(&self) -> Option<String>;

    /// Whether the backing store answers
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
