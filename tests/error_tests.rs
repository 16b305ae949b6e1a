// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use appointment_parser::error::SchedulerError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::{json, Value};

#[test]
fn test_error_display_messages() {
    let errors = vec![
        SchedulerError::InvalidRequest("Bad request".to_string()),
        SchedulerError::Config("missing key".to_string()),
        SchedulerError::GeminiApi("API error".to_string()),
        SchedulerError::Internal("boom".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_invalid_request_is_client_error() {
    let error = SchedulerError::InvalidRequest("Please provide either text or an image.".to_string());
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error.detail(), "Please provide either text or an image.");
}

#[test]
fn test_gemini_api_error_is_server_error() {
    let error = SchedulerError::GeminiApi("Connection refused".to_string());
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error.detail(),
        "An error occurred: Gemini API error: Connection refused"
    );
}

#[test]
fn test_json_error_converts() {
    let parse_err = serde_json::from_str::<Value>("not json").unwrap_err();
    let error: SchedulerError = parse_err.into();
    assert!(matches!(error, SchedulerError::Json(_)));
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_body_uses_detail_field() {
    let response = SchedulerError::InvalidRequest("Invalid file type. Please upload an image.".to_string())
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"detail": "Invalid file type. Please upload an image."}));
}
