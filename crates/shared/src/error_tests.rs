use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::Network("test".into()), 502, "NETWORK_ERROR")]
#[case(AppError::ExternalService("test".into()), 502, "EXTERNAL_SERVICE_ERROR")]
#[case(AppError::Channel("test".into()), 502, "CHANNEL_ERROR")]
#[case(AppError::Configuration("test".into()), 500, "CONFIGURATION_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_codes(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Validation("msg".into())),
        "Validation error: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::Network("msg".into())),
        "Network error: msg"
    );
    assert_eq!(
        format!("{}", AppError::Channel("msg".into())),
        "Channel error: msg"
    );
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::Validation(String::new()).is_client_error());
    assert!(AppError::Conflict(String::new()).is_client_error());
    assert!(!AppError::Network(String::new()).is_client_error());
    assert!(!AppError::Internal(String::new()).is_client_error());
}

#[test]
fn test_from_serde_json_error() {
    let err = serde_json::from_str::<u32>("not json").unwrap_err();
    let app: AppError = err.into();
    assert_eq!(app.error_code(), "INTERNAL_ERROR");
}
