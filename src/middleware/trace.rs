//! Request spans for `TraceLayer` with secrets stripped from the query string.

use axum::http::{header::HOST, Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query keys whose values never reach the logs.
const REDACTED_KEYS: &[&str] = &["token", "access_token", "password", "secret", "api_key"];

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let host = request
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %redact_query(request.uri()),
            host = %host,
        )
    }
}

fn redact_query(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_redacted(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>();

    format!("{}?{}", uri.path(), pairs.join("&"))
}

fn is_redacted(key: &str) -> bool {
    REDACTED_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k))
}
