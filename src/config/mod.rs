//! Configuration management for YachtCash Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Upper bound on a single request, applied as a tower layer
    pub request_timeout_secs: u64,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Tenant resolution configuration
    pub tenancy: TenancyConfig,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
    /// Optional super-admin account created at startup
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: i64,
}

/// Tenant resolution settings.
#[derive(Debug, Clone)]
pub struct TenancyConfig {
    /// Header carrying an explicit tenant id (matched case-insensitively)
    pub header_name: String,
    /// The service's own brand label, e.g. `yachtcash` in `yachtcash.com`
    pub apex_label: String,
    /// Extra host labels that never name a tenant
    pub reserved_labels: Vec<String>,
    /// Paths that bypass resolution entirely
    pub skip_rules: Vec<SkipRule>,
}

/// A path pattern that bypasses tenant resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipRule {
    /// Matches only this exact path
    Exact(String),
    /// Matches any path starting with this prefix
    Prefix(String),
}

impl SkipRule {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            SkipRule::Exact(p) => path == p,
            SkipRule::Prefix(p) => path.starts_with(p.as_str()),
        }
    }

    /// Parse `=/path` as an exact rule and anything else as a prefix rule.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix('=') {
            Some(exact) => Some(SkipRule::Exact(exact.to_string())),
            None => Some(SkipRule::Prefix(raw.to_string())),
        }
    }
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            header_name: "x-tenant-id".to_string(),
            apex_label: "yachtcash".to_string(),
            reserved_labels: vec!["www".to_string()],
            skip_rules: default_skip_rules(),
        }
    }
}

fn default_skip_rules() -> Vec<SkipRule> {
    vec![
        SkipRule::Exact("/".to_string()),
        SkipRule::Prefix("/api/super-admin".to_string()),
        SkipRule::Prefix("/health".to_string()),
        SkipRule::Prefix("/ready".to_string()),
        SkipRule::Prefix("/metrics".to_string()),
        SkipRule::Prefix("/admin".to_string()),
    ]
}

impl TenancyConfig {
    /// Whether a host label can never name a tenant.
    pub fn is_reserved_label(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(&self.apex_label)
            || self
                .reserved_labels
                .iter()
                .any(|r| label.eq_ignore_ascii_case(r))
    }

    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_rules.iter().any(|rule| rule.matches(path))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `json` or `pretty`
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = TenancyConfig::default();

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                issuer: env::var("JWT_ISSUER")
                    .unwrap_or_else(|_| "https://api.yachtcash.com".to_string()),
                access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "604800".to_string())
                    .parse()
                    .unwrap_or(604800),
            },
            tenancy: TenancyConfig {
                header_name: env::var("TENANT_HEADER")
                    .map(|h| h.trim().to_lowercase())
                    .unwrap_or(defaults.header_name),
                apex_label: env::var("TENANT_APEX_LABEL")
                    .map(|l| l.trim().to_lowercase())
                    .unwrap_or(defaults.apex_label),
                reserved_labels: env::var("TENANT_RESERVED_LABELS")
                    .map(|raw| split_list(&raw))
                    .unwrap_or(defaults.reserved_labels),
                skip_rules: env::var("TENANT_SKIP_PREFIXES")
                    .map(|raw| raw.split(',').filter_map(SkipRule::parse).collect())
                    .unwrap_or(defaults.skip_rules),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            },
            bootstrap_admin: match (
                env::var("SUPER_ADMIN_EMAIL"),
                env::var("SUPER_ADMIN_PASSWORD"),
            ) {
                (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                    Some(BootstrapAdminConfig { email, password })
                }
                _ => None,
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
