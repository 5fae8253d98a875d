use beeline_codec::CodecError;
use beeline_transport::{ConfigError, TransportError};
use beeline_types::LogicalKind;
use thiserror::Error;

/// Where a type mismatch was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MismatchOrigin {
    /// A verified read whose content resolved to a different kind.
    Read { hash: String },
    /// A write whose payload cannot be encoded as the requested kind.
    Write { kind: LogicalKind },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Hash '{hash}' not found or could not be retrieved from Swarm (code {status_code})")]
    ResourceNotFound { hash: String, status_code: u16 },

    #[error("{}", mismatch_message(.expected, .origin))]
    TypeMismatch {
        expected: String,
        actual: String,
        origin: MismatchOrigin,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("upload rejected by gateway (code {status_code}): {message}")]
    UploadRejected { status_code: u16, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn read_mismatch(hash: &str, requested: LogicalKind, resolved: LogicalKind) -> Self {
        Self::TypeMismatch {
            expected: requested.name().to_string(),
            actual: resolved.name().to_string(),
            origin: MismatchOrigin::Read { hash: hash.to_string() },
        }
    }

    pub(crate) fn write_mismatch(kind: LogicalKind, required: &str, actual: &str) -> Self {
        Self::TypeMismatch {
            expected: required.to_string(),
            actual: actual.to_string(),
            origin: MismatchOrigin::Write { kind },
        }
    }
}

fn mismatch_message(expected: &str, origin: &MismatchOrigin) -> String {
    match origin {
        MismatchOrigin::Read { hash } => format!("Hash '{hash}' is not of type '{expected}'"),
        MismatchOrigin::Write { kind } => format!(
            "{} upload requested, but content is not of type '{expected}'.",
            kind.upload_label()
        ),
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
