//! Foundation types for Beeline.
//!
//! Everything here is a pure value type: the closed set of logical kinds and
//! their wire mapping, the metadata read back from a fetch and the resolver
//! that interprets it, and the tables, values and payloads that flow through
//! the codecs.
//!
//! # Key Types
//!
//! - [`LogicalKind`]: raw, JSON, CSV or columnar; maps to MIME type and suffix
//! - [`ContentMetadata`]: response hints; [`ContentMetadata::resolve`] infers a kind
//! - [`Table`]: rectangular named-column dataset of [`Cell`]s
//! - [`StructuredValue`]: decoded read result
//! - [`Payload`]: write input

pub mod error;
pub mod kind;
pub mod metadata;
pub mod table;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use kind::{CodecDescriptor, LogicalKind};
pub use metadata::{parse_content_disposition, ContentMetadata};
pub use table::{Cell, ColumnType, Table};
pub use value::{Payload, PayloadType, StructuredValue};
