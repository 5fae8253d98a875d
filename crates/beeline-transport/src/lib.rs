//! Gateway access for Beeline.
//!
//! The [`Transport`] trait is the one seam between the typed client and the
//! network: download by hash, upload with MIME type, file name and postage
//! batch, and buy postage batches. [`HttpTransport`] speaks to a real gateway
//! over its `/bzz` and `/stamps` endpoints; [`MemoryGateway`] keeps
//! everything in process for tests and embedding.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod memory;
pub mod transport;

pub use config::{GatewayConfig, DEFAULT_GATEWAY_URL, GATEWAY_URL_ENV};
pub use endpoint::{NULL_BATCH_ID, POSTAGE_BATCH_HEADER};
pub use error::{ConfigError, ConfigResult, TransportError, TransportResult};
pub use http::HttpTransport;
pub use memory::MemoryGateway;
pub use transport::{FetchResponse, Transport, Upload, UploadResponse};
