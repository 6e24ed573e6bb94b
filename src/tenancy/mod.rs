//! Tenant resolution for inbound requests.
//!
//! Resolution is split into a pure planning step, [`plan_tenant_lookup`],
//! and an async step, [`resolve_tenant`], that performs the single
//! subdomain lookup when the plan calls for one. The outcome is an
//! immutable [`RequestContext`] stored in the request extensions.

use crate::config::TenancyConfig;
use crate::repository::TenantRepository;
use axum::http::HeaderMap;
use metrics::counter;
use serde::Serialize;
use std::net::IpAddr;

/// How the tenant of a request was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantSource {
    /// Path is tenant-independent; resolution never ran
    Skipped,
    /// Taken verbatim from the tenant header
    Header,
    /// Looked up from the first host label
    Subdomain,
    /// Resolution ran and found nothing
    Unresolved,
}

impl TenantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantSource::Skipped => "skipped",
            TenantSource::Header => "header",
            TenantSource::Subdomain => "subdomain",
            TenantSource::Unresolved => "unresolved",
        }
    }
}

/// Per-request tenant context. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    tenant_id: Option<String>,
    source: TenantSource,
}

impl RequestContext {
    pub fn skipped() -> Self {
        Self {
            tenant_id: None,
            source: TenantSource::Skipped,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            tenant_id: None,
            source: TenantSource::Unresolved,
        }
    }

    pub fn resolved(tenant_id: impl Into<String>, source: TenantSource) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            source,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn source(&self) -> TenantSource {
        self.source
    }
}

/// What resolution has to do for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantLookup {
    /// Skip-listed path: no lookup, no context
    Skip,
    /// Header value, used as the tenant id without an existence check
    Header(String),
    /// Host label that has to be looked up
    Subdomain(String),
    /// Nothing to look up (reserved label, bare host, IP address)
    Unresolved,
}

/// Decide how to resolve the tenant, without touching the data layer.
pub fn plan_tenant_lookup(
    headers: &HeaderMap,
    host: Option<&str>,
    path: &str,
    config: &TenancyConfig,
) -> TenantLookup {
    if config.is_skipped(path) {
        return TenantLookup::Skip;
    }

    if let Some(value) = headers
        .get(config.header_name.as_str())
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return TenantLookup::Header(value.to_string());
    }

    match host.and_then(host_label) {
        Some(label) if !config.is_reserved_label(&label) => TenantLookup::Subdomain(label),
        _ => TenantLookup::Unresolved,
    }
}

/// First dot-delimited label of a host, lowercased and without port.
///
/// Hosts with a single label (`localhost`) and IP literals have no tenant label.
pub fn host_label(host: &str) -> Option<String> {
    let host = host.trim();
    if host.starts_with('[') {
        return None;
    }

    let hostname = host.split(':').next().unwrap_or(host).trim_end_matches('.');
    if hostname.parse::<IpAddr>().is_ok() {
        return None;
    }

    let mut labels = hostname.split('.');
    let first = labels.next()?;
    labels.next()?;

    if first.is_empty() {
        return None;
    }
    Some(first.to_ascii_lowercase())
}

/// Resolve the tenant of a request. Never fails.
///
/// Performs at most one repository call, and only for [`TenantLookup::Subdomain`].
pub async fn resolve_tenant<R>(
    repo: &R,
    headers: &HeaderMap,
    host: Option<&str>,
    path: &str,
    config: &TenancyConfig,
) -> RequestContext
where
    R: TenantRepository + ?Sized,
{
    let context = match plan_tenant_lookup(headers, host, path, config) {
        TenantLookup::Skip => RequestContext::skipped(),
        TenantLookup::Header(tenant_id) => {
            RequestContext::resolved(tenant_id, TenantSource::Header)
        }
        TenantLookup::Subdomain(label) => match repo.find_by_subdomain(&label).await {
            Ok(Some(tenant)) => {
                RequestContext::resolved(tenant.id.to_string(), TenantSource::Subdomain)
            }
            Ok(None) => {
                tracing::debug!(subdomain = %label, "No tenant for subdomain");
                RequestContext::unresolved()
            }
            Err(e) => {
                tracing::warn!(subdomain = %label, error = %e, "Tenant lookup failed");
                RequestContext::unresolved()
            }
        },
        TenantLookup::Unresolved => RequestContext::unresolved(),
    };

    counter!("yachtcash_tenant_resolutions_total", "source" => context.source().as_str())
        .increment(1);
    context
}
