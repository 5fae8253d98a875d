use thiserror::Error;

/// Failures talking to the gateway, as opposed to the gateway answering
/// with a non-success status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },
}

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
