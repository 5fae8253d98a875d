use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The semantic category of a stored payload, independent of how the
/// gateway transports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalKind {
    /// Opaque bytes.
    Raw,
    /// A JSON document.
    Json,
    /// A table serialized as comma-separated text.
    Csv,
    /// A table serialized as Apache Parquet.
    Columnar,
}

impl LogicalKind {
    /// Every kind, in mapping-table order.
    pub const ALL: [LogicalKind; 4] = [Self::Raw, Self::Json, Self::Csv, Self::Columnar];

    /// Name used when reporting a kind to callers (`bytes`, `json`, `csv`,
    /// `parquet`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Raw => "bytes",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Columnar => "parquet",
        }
    }

    /// Label used in upload validation messages.
    pub fn upload_label(&self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Columnar => "Parquet",
        }
    }

    /// The wire descriptor for this kind.
    pub fn descriptor(&self) -> &'static CodecDescriptor {
        match self {
            Self::Raw => &CodecDescriptor::RAW,
            Self::Json => &CodecDescriptor::JSON,
            Self::Csv => &CodecDescriptor::CSV,
            Self::Columnar => &CodecDescriptor::COLUMNAR,
        }
    }

    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        self.descriptor().mime_type
    }

    /// Default file-name suffix, including the leading dot.
    pub fn default_suffix(&self) -> &'static str {
        self.descriptor().default_suffix
    }

    /// File name used for uploads that do not name themselves.
    pub fn default_file_name(&self) -> String {
        format!("file{}", self.default_suffix())
    }

    /// Whether this kind carries a table.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Columnar)
    }

    /// Map a MIME type to a kind, if it is one we know.
    ///
    /// Matching ignores case and any `;`-separated parameters.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        CodecDescriptor::TABLE.iter().find_map(|d| {
            let hit = d.mime_type.eq_ignore_ascii_case(essence)
                || d.mime_aliases.iter().any(|a| a.eq_ignore_ascii_case(essence));
            hit.then_some(d.kind)
        })
    }

    /// Map a suffix (`.csv` or `csv`) to a kind, if it is one we know.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.trim_start_matches('.');
        CodecDescriptor::TABLE.iter().find_map(|d| {
            d.default_suffix[1..]
                .eq_ignore_ascii_case(suffix)
                .then_some(d.kind)
        })
    }

    /// Map the suffix of a file name to a kind.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, suffix) = file_name.rsplit_once('.')?;
        Self::from_suffix(suffix)
    }

    /// Like [`from_mime_type`](Self::from_mime_type), but unknown types are
    /// `Raw`.
    pub fn for_mime_type(mime: &str) -> Self {
        Self::from_mime_type(mime).unwrap_or(Self::Raw)
    }

    /// Like [`from_suffix`](Self::from_suffix), but unknown suffixes are
    /// `Raw`.
    pub fn for_suffix(suffix: &str) -> Self {
        Self::from_suffix(suffix).unwrap_or(Self::Raw)
    }
}

impl fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "bytes" | "bin" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "parquet" | "columnar" => Ok(Self::Columnar),
            _ => Err(TypeError::UnknownKind(s.to_string())),
        }
    }
}

/// Wire metadata attached to one logical kind.
#[derive(Debug, PartialEq, Eq)]
pub struct CodecDescriptor {
    pub kind: LogicalKind,
    pub mime_type: &'static str,
    pub default_suffix: &'static str,
    /// Other MIME types gateways are known to serve for this kind.
    pub mime_aliases: &'static [&'static str],
}

impl CodecDescriptor {
    pub const RAW: Self = Self {
        kind: LogicalKind::Raw,
        mime_type: "application/octet-stream",
        default_suffix: ".bin",
        mime_aliases: &[],
    };
    pub const JSON: Self = Self {
        kind: LogicalKind::Json,
        mime_type: "application/json",
        default_suffix: ".json",
        mime_aliases: &["text/json"],
    };
    pub const CSV: Self = Self {
        kind: LogicalKind::Csv,
        mime_type: "text/csv",
        default_suffix: ".csv",
        mime_aliases: &["application/csv"],
    };
    pub const COLUMNAR: Self = Self {
        kind: LogicalKind::Columnar,
        mime_type: "application/vnd.apache.parquet",
        default_suffix: ".parquet",
        mime_aliases: &["application/parquet", "application/x-parquet"],
    };

    /// The full mapping table.
    pub const TABLE: [&'static Self; 4] = [&Self::RAW, &Self::JSON, &Self::CSV, &Self::COLUMNAR];
}
