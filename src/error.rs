#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    // Invalid user input
    //
    #[error("Environment variable {0} must be set to push images")]
    MissingCredential(&'static str),

    //
    // Error from container engine
    //
    #[error(transparent)]
    EngineError(#[from] bollard::errors::Error),
    #[error("Failed to pull image: {0}")]
    PullFailed(String),
    #[error("Failed to push image: {0}")]
    PushFailed(String),
    #[error(transparent)]
    InvalidJson(#[from] serde_json::error::Error),

    //
    // System error
    //
    #[error(transparent)]
    UnknownIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
