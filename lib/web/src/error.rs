use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

/// Fixed body of the response to a rejected SPARQL Update request.
pub const UPDATE_REJECTED_MESSAGE: &str = "SPARQL Update queries are not permitted.";

#[derive(thiserror::Error, Debug)]
pub enum SparqlGatewayError {
    #[error("SPARQL Update queries are not permitted")]
    UpdateRejected,
    #[error("Bad request: {0}")]
    MalformedRequest(String),
    /// The backend answered with a non-200 status. Relayed unchanged, this is
    /// a backend/query-level condition, not a gateway fault.
    #[error("Backend responded with status {status}")]
    Backend {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(#[from] reqwest::Error),
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for SparqlGatewayError {
    fn into_response(self) -> Response {
        match self {
            SparqlGatewayError::UpdateRejected => plain_text(
                StatusCode::FORBIDDEN,
                Bytes::from_static(UPDATE_REJECTED_MESSAGE.as_bytes()),
            ),
            SparqlGatewayError::MalformedRequest(msg) => {
                plain_text(StatusCode::BAD_REQUEST, Bytes::from(msg))
            }
            SparqlGatewayError::Backend {
                status,
                content_type,
                body,
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
                    response.headers_mut().insert(CONTENT_TYPE, value);
                }
                response
            }
            SparqlGatewayError::BackendUnreachable(_) => plain_text(
                StatusCode::BAD_GATEWAY,
                Bytes::from_static(b"Could not reach the SPARQL endpoint."),
            ),
            SparqlGatewayError::Internal(e) => {
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, Bytes::from(e.to_string()))
            }
        }
    }
}

fn plain_text(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_rejection_is_a_403_with_the_fixed_message() {
        let response = SparqlGatewayError::UpdateRejected.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain"
        );
    }

    #[test]
    fn malformed_request_is_a_400() {
        let response =
            SparqlGatewayError::MalformedRequest("missing 'query' parameter".to_owned())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_errors_relay_the_original_status_and_content_type() {
        let response = SparqlGatewayError::Backend {
            status: 503,
            content_type: Some("application/sparql-results+json".to_owned()),
            body: Bytes::from_static(b"{}"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/sparql-results+json"
        );
    }

    #[test]
    fn invalid_backend_status_degrades_to_a_502() {
        let response = SparqlGatewayError::Backend {
            status: 99,
            content_type: None,
            body: Bytes::new(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
