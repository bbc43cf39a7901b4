//! Tests for error handling and IntoResponse implementation.

use crate::error::*;
use axum::{http::StatusCode, response::IntoResponse};
use podgate_core::{AccessMode, AuthorizationError, ResourceIdentifier, StoreError};

fn denial(unauthenticated: bool) -> ServerError {
    let target = ResourceIdentifier::new("http://localhost:3000/doc");
    let mode = AccessMode::Write;
    let err = if unauthenticated {
        AuthorizationError::Unauthenticated { target, mode }
    } else {
        AuthorizationError::Forbidden { target, mode }
    };
    podgate_core::Error::from(err).into()
}

async fn body_json(error: ServerError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_status_code_correctness() {
    let test_cases = [
        (denial(true), StatusCode::UNAUTHORIZED, 401),
        (denial(false), StatusCode::FORBIDDEN, 403),
        (
            podgate_core::Error::UnsupportedMethod("PROPFIND".to_string()).into(),
            StatusCode::METHOD_NOT_ALLOWED,
            405,
        ),
        (
            podgate_core::Error::from(StoreError::Unavailable("down".to_string())).into(),
            StatusCode::INTERNAL_SERVER_ERROR,
            500,
        ),
        (
            podgate_core::Error::Handler("boom".to_string()).into(),
            StatusCode::INTERNAL_SERVER_ERROR,
            500,
        ),
        (
            ServerError::InvalidRequest("".to_string()),
            StatusCode::BAD_REQUEST,
            400,
        ),
    ];

    for (error, expected_status, expected_code) in test_cases {
        let response = error.into_response();
        let (parts, _body) = response.into_parts();

        assert_eq!(parts.status, expected_status);
        assert_eq!(parts.status.as_u16(), expected_code);
    }
}

#[tokio::test]
async fn test_body_format() {
    let (status, body) = body_json(denial(false)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    assert_eq!(
        body["error"],
        "authorization denied: write not permitted on http://localhost:3000/doc"
    );
}

#[tokio::test]
async fn test_invalid_request_message_is_escaped() {
    let (status, body) =
        body_json(ServerError::InvalidRequest(r#"Field "body" is not UTF-8"#.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], r#"Invalid request: Field "body" is not UTF-8"#);
}

#[test]
fn test_server_error_from_core_error() {
    let server_error: ServerError = podgate_core::Error::Config("bad".to_string()).into();
    assert!(matches!(server_error, ServerError::Pipeline(_)));
    assert_eq!(server_error.to_string(), "configuration error: bad");
}

#[test]
fn test_error_types_are_send_sync() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}

    is_send::<ServerError>();
    is_sync::<ServerError>();
    is_send::<BuildError>();
}
