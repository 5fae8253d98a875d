//! Typed client for a content-addressed object gateway.
//!
//! A [`Connection`] reads and writes JSON documents, tables and raw bytes.
//! Writes label each upload with a MIME type and file name derived from its
//! logical kind; reads use those labels to tell what came back, and can
//! refuse content whose labels disagree with the kind the caller expects.
//!
//! ```no_run
//! use beeline_sdk::{Connection, LogicalKind, ReadOptions, Table, WriteRequest};
//!
//! # async fn demo() -> beeline_sdk::ClientResult<()> {
//! let connection = Connection::from_env()?;
//! let table = Table::from_rows(["a", "b"], [[1, 2], [3, 4]]).expect("rectangular");
//! let hash = connection.write_file(WriteRequest::new(table)).await?;
//! let _table = connection
//!     .read_file(&hash, ReadOptions::as_kind(LogicalKind::Csv).verified())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod request;

pub use connection::Connection;
pub use error::{ClientError, ClientResult, MismatchOrigin};
pub use request::{ReadOptions, WriteRequest};

// Re-export key types
pub use beeline_codec::{CodecError, CodecRegistry, Purpose};
pub use beeline_transport::{
    GatewayConfig, HttpTransport, MemoryGateway, Transport, TransportError, NULL_BATCH_ID,
};
pub use beeline_types::{
    Cell, ColumnType, ContentMetadata, LogicalKind, Payload, PayloadType, StructuredValue, Table,
};
