//! Error types for the 500px provider

use thiserror::Error;

/// Message used when 500px answers without a usable photo
pub const FETCH_FAILED_MESSAGE: &str = "The media could not be retrieved.";

/// 500px provider errors
#[derive(Error, Debug)]
pub enum D500pxError {
    /// The API answered without a photo resource
    #[error("{0}")]
    FetchFailed(String),

    /// API request returned a non-success status
    #[error("500px API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// No consumer key was configured for the client
    #[error("500px consumer key is not configured")]
    MissingConsumerKey,

    /// The request never produced a response
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

impl D500pxError {
    pub fn fetch_failed() -> Self {
        D500pxError::FetchFailed(FETCH_FAILED_MESSAGE.to_string())
    }
}

/// Result type for 500px operations
pub type Result<T> = std::result::Result<T, D500pxError>;

impl From<D500pxError> for bridge_traits::error::BridgeError {
    fn from(error: D500pxError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            D500pxError::FetchFailed(msg) => BridgeError::OperationFailed(msg),
            D500pxError::ApiError {
                status_code,
                message,
            } => BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status_code, message
            )),
            D500pxError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            D500pxError::MissingConsumerKey => {
                BridgeError::NotAvailable("500px consumer key is not configured".to_string())
            }
            D500pxError::NetworkError(msg) => {
                BridgeError::NotAvailable(format!("Network error: {}", msg))
            }
            D500pxError::BridgeError(e) => e,
        }
    }
}
