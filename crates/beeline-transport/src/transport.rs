use async_trait::async_trait;
use beeline_types::ContentMetadata;

use crate::error::TransportResult;

/// What the gateway sent back for a download.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Type hints carried by the response headers.
    pub fn metadata(&self) -> ContentMetadata {
        ContentMetadata::from_headers(
            self.content_type.as_deref(),
            self.content_disposition.as_deref(),
        )
    }
}

/// One upload: the encoded body plus the headers and parameters that go
/// with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub body: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    pub batch_id: String,
}

/// What the gateway sent back for an upload.
///
/// `reference` is set exactly when the status is a success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub reference: Option<String>,
    pub message: String,
}

impl UploadResponse {
    pub fn accepted(status: u16, reference: impl Into<String>) -> Self {
        Self {
            status,
            reference: Some(reference.into()),
            message: String::new(),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            reference: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response access to a content-addressed gateway.
///
/// Non-success statuses come back as values; `Err` means the exchange itself
/// failed.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, hash: &str) -> TransportResult<FetchResponse>;
    async fn upload(&self, upload: Upload) -> TransportResult<UploadResponse>;
    async fn create_postage_batch(&self, amount: u64, depth: u8) -> TransportResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use beeline_types::LogicalKind;

    #[test]
    fn fetch_response_metadata_from_headers() {
        let response = FetchResponse {
            status: 200,
            body: b"{}".to_vec(),
            content_type: Some("application/json".into()),
            content_disposition: None,
        };
        assert!(response.is_success());
        assert_eq!(response.metadata().resolve(), LogicalKind::Json);
    }

    #[test]
    fn upload_response_constructors() {
        let ok = UploadResponse::accepted(201, "ab");
        assert!(ok.is_success());
        assert_eq!(ok.reference.as_deref(), Some("ab"));

        let rejected = UploadResponse::rejected(402, "payment required");
        assert!(!rejected.is_success());
        assert!(rejected.reference.is_none());
    }
}
