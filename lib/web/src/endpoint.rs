//! Inbound side of the gateway: projects an HTTP request onto one of three
//! actions (render the query form, reject, forward) and drives the
//! classifier and forwarder accordingly.

use crate::app::render_query_form;
use crate::classifier::{classify, Classification};
use crate::config::EndpointBinding;
use crate::error::SparqlGatewayError;
use crate::forward::{forward, ForwardMethod};
use crate::AppState;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use bytes::Bytes;
use mediatype::names::APPLICATION;
use mediatype::{MediaType, Name};
use url::form_urlencoded;

const FORM_URLENCODED: Name<'static> = Name::new_unchecked("x-www-form-urlencoded");
const SPARQL_QUERY: Name<'static> = Name::new_unchecked("sparql-query");

/// What a POST body turned out to contain.
enum PostPayload {
    /// `application/x-www-form-urlencoded`, query under the `query` key.
    Form,
    /// `application/sparql-query`, the body is the query.
    Direct,
    /// Anything else; resolved by redirecting home, not by erroring.
    Unsupported,
}

fn recognize_content_type(content_type: Option<&str>) -> PostPayload {
    let Some(raw) = content_type else {
        return PostPayload::Unsupported;
    };
    let Ok(media_type) = MediaType::parse(raw) else {
        return PostPayload::Unsupported;
    };

    if media_type.ty == APPLICATION && media_type.subty == FORM_URLENCODED {
        PostPayload::Form
    } else if media_type.ty == APPLICATION && media_type.subty == SPARQL_QUERY {
        PostPayload::Direct
    } else {
        PostPayload::Unsupported
    }
}

/// Extracts the `query` parameter from a URL-encoded query string or body.
fn extract_query_param(encoded: &str) -> Result<String, SparqlGatewayError> {
    form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key == "query")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            SparqlGatewayError::MalformedRequest("missing required parameter 'query'".to_owned())
        })
}

fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(ACCEPT).and_then(|v| v.to_str().ok())
}

pub(crate) async fn handle_sparql_get(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    RawQuery(query_string): RawQuery,
    headers: HeaderMap,
) -> Result<Response, SparqlGatewayError> {
    let Some(binding) = state.config.binding(&endpoint) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let Some(query_string) = query_string.filter(|qs| !qs.trim().is_empty()) else {
        return Ok(render_query_form(&state.config, binding).into_response());
    };

    let raw_query = extract_query_param(&query_string)?;
    classify_and_forward(
        &state,
        binding,
        &raw_query,
        ForwardMethod::Get,
        accept_header(&headers),
    )
    .await
}

pub(crate) async fn handle_sparql_post(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SparqlGatewayError> {
    let Some(binding) = state.config.binding(&endpoint) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let (raw_query, method) = match recognize_content_type(content_type) {
        PostPayload::Form => {
            let body = utf8_body(&body)?;
            if body.trim().is_empty() {
                return Ok(render_query_form(&state.config, binding).into_response());
            }
            (extract_query_param(body)?, ForwardMethod::PostForm)
        }
        PostPayload::Direct => (utf8_body(&body)?.to_owned(), ForwardMethod::PostDirect),
        PostPayload::Unsupported => return Ok(Redirect::to("/").into_response()),
    };

    classify_and_forward(&state, binding, &raw_query, method, accept_header(&headers)).await
}

fn utf8_body(body: &Bytes) -> Result<&str, SparqlGatewayError> {
    std::str::from_utf8(body).map_err(|_| {
        SparqlGatewayError::MalformedRequest("request body is not valid UTF-8".to_owned())
    })
}

/// Runs the classifier and, for read queries, the forwarder.
///
/// The sanitized text is what travels to the backend, on GET and POST alike.
/// An update never reaches this function's forwarding branch.
async fn classify_and_forward(
    state: &AppState,
    binding: &EndpointBinding,
    raw_query: &str,
    method: ForwardMethod,
    accept: Option<&str>,
) -> Result<Response, SparqlGatewayError> {
    match classify(raw_query) {
        Classification::Update => {
            tracing::info!(endpoint = %binding.name, "rejected SPARQL Update");
            Err(SparqlGatewayError::UpdateRejected)
        }
        Classification::Query(sanitized) if sanitized.is_empty() => {
            Ok(render_query_form(&state.config, binding).into_response())
        }
        Classification::Query(sanitized) => {
            let backend = forward(&state.client, binding, &sanitized, method, accept).await?;
            Ok(backend.into_response())
        }
    }
}
