//! Outbound side of the gateway: contacts the bound triple store and turns
//! its answer into an outward response.

use crate::config::EndpointBinding;
use crate::error::SparqlGatewayError;
use axum::body::Body;
use axum::http::header::{
    HeaderValue, ACCEPT, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use mediatype::names::{APPLICATION, JSON};
use mediatype::MediaType;

/// Accept header used when the caller expresses no preference.
pub const DEFAULT_ACCEPT: &str = "application/sparql-results+xml";

const SPARQL_QUERY: &str = "application/sparql-query";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// How the query travels to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    /// GET with the query as a URL-encoded parameter.
    Get,
    /// POST with a `query=` form body.
    PostForm,
    /// POST with the query as the raw `application/sparql-query` body.
    PostDirect,
}

/// Verbatim response from a backend triple store.
#[derive(Debug)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl IntoResponse for BackendResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        if let Some(value) = self
            .content_type
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            headers.insert(CONTENT_TYPE, value);
        }
        response
    }
}

/// Resolves the outbound Accept header.
///
/// Absent, empty, or `*/*` preferences fall back to SPARQL XML results.
pub fn resolve_accept(accept: Option<&str>) -> &str {
    match accept {
        Some(value) if !value.trim().is_empty() && value.trim() != "*/*" => value,
        _ => DEFAULT_ACCEPT,
    }
}

/// Performs the single backend call for a request.
///
/// A 200 answer comes back as [`BackendResponse`]; any other status is
/// relayed through [`SparqlGatewayError::Backend`], and network failures
/// surface as [`SparqlGatewayError::BackendUnreachable`]. No retries.
pub async fn forward(
    client: &reqwest::Client,
    binding: &EndpointBinding,
    query: &str,
    method: ForwardMethod,
    accept: Option<&str>,
) -> Result<BackendResponse, SparqlGatewayError> {
    let accept = resolve_accept(accept);
    let request = match method {
        ForwardMethod::Get => client
            .get(&binding.backend_url)
            .query(&[("query", query)]),
        ForwardMethod::PostForm => client
            .post(&binding.backend_url)
            .form(&[("query", query)]),
        ForwardMethod::PostDirect => client
            .post(&binding.backend_url)
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .body(query.to_owned()),
    };

    let response = request
        .header(ACCEPT, accept)
        .send()
        .await
        .inspect_err(|e| {
            tracing::warn!(endpoint = %binding.name, error = %e, "backend unreachable");
        })?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    let body = response.bytes().await?;

    if status != StatusCode::OK.as_u16() {
        tracing::debug!(endpoint = %binding.name, status, "relaying backend error");
        return Err(SparqlGatewayError::Backend {
            status,
            content_type,
            body,
        });
    }

    Ok(BackendResponse {
        status,
        content_type: content_type.map(normalize_content_type),
        body,
    })
}

/// Rewrites a bare `application/json` into the SPARQL results media type.
///
/// Backends report generic JSON, but protocol clients expect
/// `application/sparql-results+json`.
fn normalize_content_type(content_type: String) -> String {
    match MediaType::parse(&content_type) {
        Ok(media_type)
            if media_type.ty == APPLICATION
                && media_type.subty == JSON
                && media_type.suffix.is_none() =>
        {
            SPARQL_RESULTS_JSON.to_owned()
        }
        _ => content_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_accept_defaults_to_sparql_xml_results() {
        assert_eq!(resolve_accept(None), DEFAULT_ACCEPT);
        assert_eq!(resolve_accept(Some("")), DEFAULT_ACCEPT);
        assert_eq!(resolve_accept(Some("  ")), DEFAULT_ACCEPT);
        assert_eq!(resolve_accept(Some("*/*")), DEFAULT_ACCEPT);
    }

    #[test]
    fn explicit_accept_is_kept() {
        assert_eq!(
            resolve_accept(Some("application/sparql-results+json")),
            "application/sparql-results+json"
        );
        assert_eq!(resolve_accept(Some("text/csv")), "text/csv");
    }

    #[test]
    fn bare_json_is_rewritten_to_sparql_results() {
        assert_eq!(
            normalize_content_type("application/json".to_owned()),
            SPARQL_RESULTS_JSON
        );
        assert_eq!(
            normalize_content_type("application/json; charset=utf-8".to_owned()),
            SPARQL_RESULTS_JSON
        );
    }

    #[test]
    fn other_content_types_are_forwarded_untouched() {
        assert_eq!(
            normalize_content_type(SPARQL_RESULTS_JSON.to_owned()),
            SPARQL_RESULTS_JSON
        );
        assert_eq!(
            normalize_content_type("application/sparql-results+xml".to_owned()),
            "application/sparql-results+xml"
        );
        assert_eq!(normalize_content_type("text/turtle".to_owned()), "text/turtle");
    }

    #[test]
    fn cors_headers_are_attached_to_successful_responses() {
        let response = BackendResponse {
            status: 200,
            content_type: Some(SPARQL_RESULTS_JSON.to_owned()),
            body: Bytes::from_static(b"{}"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(
            response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }
}
