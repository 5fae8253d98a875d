use std::fmt;

use beeline_types::{LogicalKind, TypeError};

/// What an engine was needed for when it turned out to be missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purpose {
    JsonDecoding,
    JsonEncoding,
    TableDecoding,
    TableEncoding,
    ColumnarDecoding,
    ColumnarEncoding,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::JsonDecoding => "JSON decoding",
            Self::JsonEncoding => "JSON encoding",
            Self::TableDecoding => "CSV/table decoding",
            Self::TableEncoding => "table encoding",
            Self::ColumnarDecoding => "columnar decoding",
            Self::ColumnarEncoding => "columnar encoding",
        };
        f.write_str(text)
    }
}

/// Errors from encoding or decoding a payload.
///
/// Parse failures keep the engine's own error as the variant payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// No registered engine can serve the request.
    #[error("{}", unavailable_message(.capabilities, .purpose))]
    CapabilityUnavailable {
        capabilities: Vec<&'static str>,
        purpose: Purpose,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// CSV input without a header row.
    #[error("no columns to parse from input")]
    EmptyData,

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "arrow")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Decoded data does not form a valid table.
    #[error("invalid table: {0}")]
    Table(#[from] TypeError),

    /// The value handed to `encode` is not one the kind can carry.
    #[error("cannot encode {value} as {kind}")]
    UnsupportedValue {
        kind: LogicalKind,
        value: &'static str,
    },
}

impl CodecError {
    /// Whether this error means the payload itself is malformed, as opposed
    /// to the environment lacking an engine or the caller passing the wrong
    /// value.
    pub fn is_parse_failure(&self) -> bool {
        !matches!(
            self,
            Self::CapabilityUnavailable { .. } | Self::UnsupportedValue { .. }
        )
    }
}

fn unavailable_message(capabilities: &[&str], purpose: &Purpose) -> String {
    match capabilities {
        [one] => format!("the {one} engine is not available, but required for {purpose}"),
        [first, second] => format!(
            "neither the {first} nor the {second} engine is available, but one is required for {purpose}"
        ),
        many => format!(
            "none of the engines {} is available, but one is required for {purpose}",
            many.join(", ")
        ),
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
