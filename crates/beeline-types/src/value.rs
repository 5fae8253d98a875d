use std::fmt;

use serde_json::Value;

use crate::kind::LogicalKind;
use crate::table::Table;

/// The decoded result of a read.
#[derive(Clone, Debug, PartialEq)]
pub enum StructuredValue {
    Bytes(Vec<u8>),
    Json(Value),
    Table(Table),
}

impl StructuredValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
            Self::Table(_) => "Table",
        }
    }
}

/// What a caller hands to a write.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Bytes(Vec<u8>),
    /// Plain text, uploaded as its UTF-8 bytes.
    Text(String),
    Json(Value),
    Table(Table),
}

impl Payload {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Bytes(_) => PayloadType::Bytes,
            Self::Text(_) => PayloadType::Text,
            Self::Json(_) => PayloadType::Json,
            Self::Table(_) => PayloadType::Table,
        }
    }

    /// The kind a payload is written as when the caller does not choose one.
    pub fn inferred_kind(&self) -> LogicalKind {
        match self {
            Self::Table(_) => LogicalKind::Csv,
            Self::Json(_) => LogicalKind::Json,
            Self::Bytes(_) | Self::Text(_) => LogicalKind::Raw,
        }
    }

    /// Whether this payload can be written as `kind` without coercion.
    pub fn fits(&self, kind: LogicalKind) -> bool {
        PayloadType::required_for(kind).contains(&self.payload_type())
    }

    /// Convert into the value handed to the encoder.
    pub fn into_value(self) -> StructuredValue {
        match self {
            Self::Bytes(b) => StructuredValue::Bytes(b),
            Self::Text(s) => StructuredValue::Bytes(s.into_bytes()),
            Self::Json(v) => StructuredValue::Json(v),
            Self::Table(t) => StructuredValue::Table(t),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Payload {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<String> for Payload {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Payload {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

impl From<Table> for Payload {
    fn from(v: Table) -> Self {
        Self::Table(v)
    }
}

impl From<StructuredValue> for Payload {
    fn from(v: StructuredValue) -> Self {
        match v {
            StructuredValue::Bytes(b) => Self::Bytes(b),
            StructuredValue::Json(v) => Self::Json(v),
            StructuredValue::Table(t) => Self::Table(t),
        }
    }
}

/// The runtime type of a payload, as reported in write-time mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadType {
    Bytes,
    Text,
    Json,
    Table,
}

impl PayloadType {
    /// Payload types accepted for a kind. The first entry is the one named
    /// when a payload is rejected.
    pub fn required_for(kind: LogicalKind) -> &'static [PayloadType] {
        match kind {
            LogicalKind::Raw => &[Self::Bytes, Self::Text],
            LogicalKind::Json => &[Self::Json],
            LogicalKind::Csv | LogicalKind::Columnar => &[Self::Table],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Text => "str",
            Self::Json => "json",
            Self::Table => "Table",
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
