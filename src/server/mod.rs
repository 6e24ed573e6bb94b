//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{tenant_context_middleware, ObservabilityLayer, SanitizedMakeSpan};
use crate::migration;
use crate::policy::Authorizer;
use crate::repository::{
    cash::CashRepositoryImpl, role::RoleRepositoryImpl, tenant::TenantRepositoryImpl,
    user::UserRepositoryImpl,
};
use crate::service::{AuthService, CashService, RbacService, TenantService};
use crate::state::HasServices;
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub tenant_service: Arc<TenantService<TenantRepositoryImpl>>,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub rbac_service: Arc<RbacService<RoleRepositoryImpl>>,
    pub cash_service: Arc<CashService<CashRepositoryImpl>>,
    pub authorizer: Arc<Authorizer<UserRepositoryImpl, RoleRepositoryImpl>>,
    pub jwt_manager: JwtManager,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire repositories and services over one pool.
    pub fn new(
        config: Config,
        db_pool: MySqlPool,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Self {
        let tenant_repo = Arc::new(TenantRepositoryImpl::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let role_repo = Arc::new(RoleRepositoryImpl::new(db_pool.clone()));
        let cash_repo = Arc::new(CashRepositoryImpl::new(db_pool.clone()));

        let jwt_manager = JwtManager::new(config.jwt.clone());

        Self {
            tenant_service: Arc::new(TenantService::new(tenant_repo, config.tenancy.clone())),
            auth_service: Arc::new(AuthService::new(user_repo.clone(), jwt_manager.clone())),
            rbac_service: Arc::new(RbacService::new(role_repo.clone())),
            cash_service: Arc::new(CashService::new(cash_repo)),
            authorizer: Arc::new(Authorizer::new(user_repo, role_repo)),
            jwt_manager,
            prometheus_handle,
            config: Arc::new(config),
            db_pool,
        }
    }
}

impl HasServices for AppState {
    type TenantRepo = TenantRepositoryImpl;
    type UserRepo = UserRepositoryImpl;
    type RoleRepo = RoleRepositoryImpl;
    type CashRepo = CashRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn tenant_service(&self) -> &TenantService<Self::TenantRepo> {
        &self.tenant_service
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo> {
        &self.auth_service
    }

    fn rbac_service(&self) -> &RbacService<Self::RoleRepo> {
        &self.rbac_service
    }

    fn cash_service(&self) -> &CashService<Self::CashRepo> {
        &self.cash_service
    }

    fn authorizer(&self) -> &Authorizer<Self::UserRepo, Self::RoleRepo> {
        &self.authorizer
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn render_metrics(&self) -> Option<String> {
        self.prometheus_handle.as_ref().map(|h| h.render())
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    migration::run_migrations(&config).await?;

    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool, prometheus_handle);
    migration::seed_defaults(&state).await?;

    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Build the HTTP router. Generic so tests can drive it with in-memory state.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout = Duration::from_secs(state.config().request_timeout_secs);

    Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/metrics", get(api::health::metrics::<S>))
        // Authentication
        .route("/api/auth/login", post(api::auth::login::<S>))
        .route("/api/auth/me", get(api::auth::me::<S>))
        .route("/api/auth/logout", post(api::auth::logout::<S>))
        // Roles and permissions
        .route("/api/admin/permissions", get(api::admin::list_permissions::<S>))
        .route(
            "/api/admin/roles",
            get(api::admin::list_roles::<S>).post(api::admin::create_role::<S>),
        )
        .route("/api/admin/roles/{id}", patch(api::admin::update_role::<S>))
        .route(
            "/api/admin/system/initialize",
            post(api::admin::initialize_system::<S>),
        )
        // Platform tenant management
        .route(
            "/api/super-admin/tenants",
            get(api::super_admin::list_tenants::<S>).post(api::super_admin::create_tenant::<S>),
        )
        .route(
            "/api/super-admin/tenants/{id}",
            get(api::super_admin::get_tenant::<S>),
        )
        .route(
            "/api/super-admin/tenants/{id}/status",
            patch(api::super_admin::update_tenant_status::<S>),
        )
        // Tenant-scoped
        .route("/api/tenant/current", get(api::tenant::current::<S>))
        .route(
            "/api/tenant/cash-balances",
            get(api::tenant::cash_balances::<S>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_context_middleware::<S>,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state)
}
