//! Client error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised while talking to the REST backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response not read.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status text.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not usable.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status: 404, message } => Self::NotFound(message),
            ClientError::Api { status: 409, message } => Self::Conflict(message),
            ClientError::Api { status: 400 | 422, message } => Self::Validation(message),
            ClientError::Api { .. } => Self::ExternalService(err.to_string()),
            ClientError::Http(e) if e.is_decode() => Self::ExternalService(e.to_string()),
            ClientError::Http(e) => Self::Network(e.to_string()),
            ClientError::Decode(e) => Self::ExternalService(e.to_string()),
            ClientError::InvalidBaseUrl(url) => Self::Configuration(format!("invalid base URL: {url}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: AppError = ClientError::Api {
            status: 404,
            message: "Budget not found".into(),
        }
        .into();
        assert_eq!(not_found, AppError::NotFound("Budget not found".into()));

        let server: AppError = ClientError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(server.status_code(), 502);
    }
}
