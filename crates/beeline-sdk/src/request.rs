use beeline_transport::NULL_BATCH_ID;
use beeline_types::{LogicalKind, Payload};

/// A value to upload and how to label it.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteRequest {
    pub payload: Payload,
    /// Kind to write as; inferred from the payload when absent.
    pub kind: Option<LogicalKind>,
    pub file_name: Option<String>,
    pub batch_id: Option<String>,
    /// Overrides the kind's MIME type.
    pub mime_type: Option<String>,
}

impl WriteRequest {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            kind: None,
            file_name: None,
            batch_id: None,
            mime_type: None,
        }
    }

    pub fn as_kind(mut self, kind: LogicalKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn effective_kind(&self) -> LogicalKind {
        self.kind.unwrap_or_else(|| self.payload.inferred_kind())
    }

    pub fn effective_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| self.effective_kind().default_file_name())
    }

    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.effective_kind().mime_type())
    }

    pub fn effective_batch_id(&self) -> &str {
        self.batch_id.as_deref().unwrap_or(NULL_BATCH_ID)
    }
}

/// How a read interprets what it fetched.
///
/// With no `kind` the body is returned untouched. With a `kind` the body is
/// decoded as that kind; `verify` first checks that the gateway's metadata
/// resolves to the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub kind: Option<LogicalKind>,
    pub verify: bool,
}

impl ReadOptions {
    pub fn raw() -> Self {
        Self::default()
    }

    pub fn as_kind(kind: LogicalKind) -> Self {
        Self {
            kind: Some(kind),
            verify: false,
        }
    }

    pub fn verified(mut self) -> Self {
        self.verify = true;
        self
    }
}
