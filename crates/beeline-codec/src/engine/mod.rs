//! Encoding engines.
//!
//! An engine turns one value type into bytes and back. The registry holds at
//! most one engine for JSON and CSV and an ordered list of columnar engines.

#[cfg(feature = "arrow")]
pub mod arrow_columnar;
pub mod delimited;
pub mod json;
pub mod parquet_columnar;

use crate::error::CodecResult;

pub const JSON_ENGINE: &str = "json";
pub const CSV_ENGINE: &str = "csv";
pub const ARROW_ENGINE: &str = "arrow";
pub const PARQUET_ENGINE: &str = "parquet";

/// Columnar engines in priority order.
pub const COLUMNAR_ENGINES: [&str; 2] = [ARROW_ENGINE, PARQUET_ENGINE];

/// A serializer/deserializer for one value type.
///
/// Implementations are stateless and shared between calls.
pub trait Engine<T>: Send + Sync {
    /// Name reported when listing engines or naming a missing capability.
    fn name(&self) -> &'static str;

    fn encode(&self, value: &T) -> CodecResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> CodecResult<T>;
}
