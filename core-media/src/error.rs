use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to fetch 500px photo {photo_id}: {message}")]
    RemoteFetchFailed { photo_id: String, message: String },

    #[error("Invalid media configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl MediaError {
    /// True when the failure came from the remote photo service
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaError::RemoteFetchFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
