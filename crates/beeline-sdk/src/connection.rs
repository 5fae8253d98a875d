use std::sync::Arc;

use beeline_codec::CodecRegistry;
use beeline_transport::{GatewayConfig, HttpTransport, Transport, TransportError, Upload};
use beeline_types::{ContentMetadata, LogicalKind, Payload, PayloadType, StructuredValue, Table};
use serde_json::Value;

use crate::error::{ClientError, ClientResult, MismatchOrigin};
use crate::request::{ReadOptions, WriteRequest};

/// Typed access to one gateway.
///
/// Reads fetch by hash and decode according to [`ReadOptions`]; writes encode
/// a [`Payload`] and upload it with a MIME type and file name that let later
/// reads resolve its kind. Holds no per-request state and can be shared
/// between tasks.
#[derive(Clone)]
pub struct Connection {
    transport: Arc<dyn Transport>,
    codecs: CodecRegistry,
}

impl Connection {
    /// Use `transport` with every codec engine compiled into this build.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            codecs: CodecRegistry::linked(),
        }
    }

    /// Connect over HTTP to the gateway at `gateway_url`.
    pub fn connect(gateway_url: impl Into<String>) -> ClientResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(gateway_url)?)))
    }

    pub fn from_config(config: &GatewayConfig) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self::new(Arc::new(HttpTransport::from_config(config)?)))
    }

    /// Connect to `BEE_GATEWAY_URL`, or the local default gateway.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(&GatewayConfig::default())
    }

    /// Replace the codec registry.
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    // ---- Reads ----

    /// Fetch `hash` and interpret it according to `options`.
    pub async fn read_file(&self, hash: &str, options: ReadOptions) -> ClientResult<StructuredValue> {
        let (body, metadata) = self.fetch(hash).await?;
        let Some(requested) = options.kind else {
            tracing::info!(hash, bytes = body.len(), "read raw");
            return Ok(StructuredValue::Bytes(body));
        };

        let resolved = metadata.resolve();
        tracing::debug!(hash, ?metadata, %resolved, %requested, "resolved content kind");
        if options.verify && resolved != requested {
            return Err(ClientError::read_mismatch(hash, requested, resolved));
        }

        let value = self.codecs.decode(requested, &body)?;
        tracing::info!(hash, kind = %requested, "read decoded");
        Ok(value)
    }

    /// Fetch `hash` and decode it as whatever kind its metadata resolves to.
    pub async fn read_resolved(&self, hash: &str) -> ClientResult<StructuredValue> {
        let (body, metadata) = self.fetch(hash).await?;
        let resolved = metadata.resolve();
        tracing::debug!(hash, ?metadata, %resolved, "resolved content kind");
        Ok(self.codecs.decode(resolved, &body)?)
    }

    /// The kind `hash` resolves to, without decoding it.
    pub async fn resolve_kind(&self, hash: &str) -> ClientResult<LogicalKind> {
        let (_, metadata) = self.fetch(hash).await?;
        Ok(metadata.resolve())
    }

    pub async fn read_bytes(&self, hash: &str) -> ClientResult<Vec<u8>> {
        let (body, _) = self.fetch(hash).await?;
        Ok(body)
    }

    pub async fn read_json(&self, hash: &str, verify: bool) -> ClientResult<Value> {
        let options = ReadOptions {
            kind: Some(LogicalKind::Json),
            verify,
        };
        match self.read_file(hash, options).await? {
            StructuredValue::Json(doc) => Ok(doc),
            other => Err(unexpected_value(hash, LogicalKind::Json.name(), &other)),
        }
    }

    /// Read `hash` as a table stored as `kind` (CSV or columnar).
    pub async fn read_table(&self, hash: &str, kind: LogicalKind, verify: bool) -> ClientResult<Table> {
        let value = self
            .read_file(hash, ReadOptions { kind: Some(kind), verify })
            .await?;
        match value {
            StructuredValue::Table(table) => Ok(table),
            other => Err(unexpected_value(hash, PayloadType::Table.name(), &other)),
        }
    }

    async fn fetch(&self, hash: &str) -> ClientResult<(Vec<u8>, ContentMetadata)> {
        let response = self.transport.fetch(hash).await?;
        if !response.is_success() {
            tracing::warn!(hash, status = response.status, "object not retrievable");
            return Err(ClientError::ResourceNotFound {
                hash: hash.to_string(),
                status_code: response.status,
            });
        }
        let metadata = response.metadata();
        Ok((response.body, metadata))
    }

    // ---- Writes ----

    /// Encode and upload `request`, returning the gateway's hash for it.
    pub async fn write_file(&self, request: WriteRequest) -> ClientResult<String> {
        let kind = request.effective_kind();
        if !request.payload.fits(kind) {
            let required = PayloadType::required_for(kind)[0];
            return Err(ClientError::write_mismatch(
                kind,
                required.name(),
                request.payload.payload_type().name(),
            ));
        }

        let mime_type = request.effective_mime_type().to_string();
        let file_name = request.effective_file_name();
        let batch_id = request.effective_batch_id().to_string();
        let body = self.codecs.encode(kind, &request.payload.into_value())?;

        tracing::info!(%kind, %mime_type, %file_name, bytes = body.len(), "uploading");
        let response = self
            .transport
            .upload(Upload {
                body,
                mime_type,
                file_name,
                batch_id,
            })
            .await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, message = %response.message, "upload rejected");
            return Err(ClientError::UploadRejected {
                status_code: response.status,
                message: response.message,
            });
        }
        let reference = response.reference.ok_or_else(|| {
            TransportError::MalformedResponse("upload accepted without a reference".into())
        })?;
        tracing::info!(%reference, "uploaded");
        Ok(reference)
    }

    /// Upload `payload` under its inferred kind and default labels.
    pub async fn write(&self, payload: impl Into<Payload>) -> ClientResult<String> {
        self.write_file(WriteRequest::new(payload)).await
    }

    /// Buy a postage batch for later uploads.
    pub async fn create_postage_batch(&self, amount: u64, depth: u8) -> ClientResult<String> {
        let batch_id = self.transport.create_postage_batch(amount, depth).await?;
        tracing::info!(%batch_id, amount, depth, "postage batch created");
        Ok(batch_id)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}

fn unexpected_value(hash: &str, expected: &str, value: &StructuredValue) -> ClientError {
    ClientError::TypeMismatch {
        expected: expected.to_string(),
        actual: value.type_name().to_string(),
        origin: MismatchOrigin::Read { hash: hash.to_string() },
    }
}
