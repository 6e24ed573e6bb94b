//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram buckets in seconds, with sub-millisecond resolution for fast endpoints.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so the exposition
/// carries HELP/TYPE lines from startup.
pub fn describe_metrics() {
    describe_counter!(
        "yachtcash_http_requests_total",
        "Total number of HTTP requests"
    );
    describe_histogram!(
        "yachtcash_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "yachtcash_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_counter!(
        "yachtcash_tenant_resolutions_total",
        "Tenant resolution outcomes by source (skipped/header/subdomain/unresolved)"
    );
    describe_counter!(
        "yachtcash_authz_decisions_total",
        "Authorization decisions by outcome (bypass/granted/unauthenticated/inactive/forbidden)"
    );
    describe_counter!(
        "yachtcash_auth_login_total",
        "Total number of login attempts"
    );

    for source in ["skipped", "header", "subdomain", "unresolved"] {
        counter!("yachtcash_tenant_resolutions_total", "source" => source).absolute(0);
    }
    for outcome in [
        "bypass",
        "granted",
        "unauthenticated",
        "inactive",
        "forbidden",
    ] {
        counter!("yachtcash_authz_decisions_total", "outcome" => outcome).absolute(0);
    }
    counter!("yachtcash_auth_login_total", "result" => "success").absolute(0);
    counter!("yachtcash_auth_login_total", "result" => "failure").absolute(0);
}
