use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Media error: {0}")]
    Media(#[from] core_media::MediaError),

    #[cfg(feature = "remote-api")]
    #[error("500px provider error: {0}")]
    Provider(#[from] provider_d500px::D500pxError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
