//! Codec layer for Beeline.
//!
//! Turns [`StructuredValue`](beeline_types::StructuredValue)s into bytes and
//! back for each [`LogicalKind`](beeline_types::LogicalKind). Which engines
//! exist is fixed when the [`CodecRegistry`] is built; asking for a kind with
//! no engine fails with [`CodecError::CapabilityUnavailable`] naming every
//! engine that could have served it.
//!
//! Columnar data has two engines in priority order: `arrow` (behind the
//! `arrow` cargo feature) and `parquet`. Both read and write standard parquet
//! files, so data written by one decodes with the other.

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::Engine;
pub use error::{CodecError, CodecResult, Purpose};
pub use registry::{CodecRegistry, CodecRegistryBuilder};
