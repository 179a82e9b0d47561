use super::*;
use serde_json::json;

#[test]
fn from_status_extracts_string_message() {
    let err = ApiError::from_status(400, r#"{"message":"Invalid OTP","statusCode":400}"#);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("Invalid OTP"));
    assert_eq!(err.to_string(), "server returned 400: Invalid OTP");
}

#[test]
fn from_status_joins_message_array() {
    let err = ApiError::from_status(422, r#"{"message":["phoneNumber must be set","otpCode too short"]}"#);
    assert_eq!(err.server_message(), Some("phoneNumber must be set; otpCode too short"));
}

#[test]
fn from_status_plain_text_body() {
    let err = ApiError::from_status(502, "Bad Gateway");
    assert!(matches!(&err, ApiError::Status { body, .. } if *body == json!("Bad Gateway")));
    assert_eq!(err.server_message(), None);
    assert_eq!(err.to_string(), "server returned 502: no message");
}

#[test]
fn from_status_empty_body_is_null() {
    let err = ApiError::from_status(500, "  ");
    assert!(matches!(err, ApiError::Status { body: Value::Null, .. }));
}

#[test]
fn unauthorized_detection() {
    assert!(ApiError::from_status(401, "{}").is_unauthorized());
    assert!(!ApiError::from_status(403, "{}").is_unauthorized());
    assert!(!ApiError::MalformedRefresh.is_unauthorized());
}

#[test]
fn display_message_falls_back() {
    let err = ApiError::MissingField("user");
    assert_eq!(err.display_message(GENERIC_FAILURE_MESSAGE), GENERIC_FAILURE_MESSAGE);

    let err = ApiError::from_status(401, r#"{"message":"Jeweler not found or inactive"}"#);
    assert_eq!(err.display_message("fallback"), "Jeweler not found or inactive");
}
