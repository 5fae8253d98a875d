use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::transport::{FetchResponse, Transport, Upload, UploadResponse};

#[derive(Clone, Debug)]
struct StoredObject {
    body: Vec<u8>,
    content_type: Option<String>,
    content_disposition: Option<String>,
}

/// In-process gateway.
///
/// Uploads are addressed by the hex BLAKE3 hash of their body and fetched
/// back with the MIME type as `Content-Type` and the file name as an inline
/// `Content-Disposition`. Every upload is recorded for inspection. Unknown
/// hashes answer 404.
pub struct MemoryGateway {
    objects: RwLock<HashMap<String, StoredObject>>,
    uploads: RwLock<Vec<Upload>>,
    batches: RwLock<Vec<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            uploads: RwLock::new(Vec::new()),
            batches: RwLock::new(Vec::new()),
        }
    }

    /// Place an object under `hash` with exactly the given response headers.
    pub fn seed(
        &self,
        hash: impl Into<String>,
        body: impl Into<Vec<u8>>,
        content_type: Option<&str>,
        content_disposition: Option<&str>,
    ) {
        let object = StoredObject {
            body: body.into(),
            content_type: content_type.map(str::to_string),
            content_disposition: content_disposition.map(str::to_string),
        };
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash.into(), object);
    }

    /// Every upload received so far, oldest first.
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_upload(&self) -> Option<Upload> {
        self.uploads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Postage batches handed out so far.
    pub fn batches(&self) -> Vec<String> {
        self.batches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address the gateway assigns to `body`.
    pub fn address_of(body: &[u8]) -> String {
        hex::encode(blake3::hash(body).as_bytes())
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGateway")
            .field("object_count", &self.len())
            .finish()
    }
}

#[async_trait]
impl Transport for MemoryGateway {
    async fn fetch(&self, hash: &str) -> TransportResult<FetchResponse> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let response = match objects.get(hash) {
            Some(object) => FetchResponse {
                status: 200,
                body: object.body.clone(),
                content_type: object.content_type.clone(),
                content_disposition: object.content_disposition.clone(),
            },
            None => FetchResponse {
                status: 404,
                body: br#"{"code":404,"message":"Not Found"}"#.to_vec(),
                content_type: Some("application/json".into()),
                content_disposition: None,
            },
        };
        Ok(response)
    }

    async fn upload(&self, upload: Upload) -> TransportResult<UploadResponse> {
        let reference = Self::address_of(&upload.body);
        let object = StoredObject {
            body: upload.body.clone(),
            content_type: Some(upload.mime_type.clone()),
            content_disposition: Some(format!(
                "inline; filename=\"{}\"",
                upload.file_name.replace('\\', "\\\\").replace('"', "\\\"")
            )),
        };
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reference.clone(), object);
        self.uploads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(upload);
        Ok(UploadResponse::accepted(201, reference))
    }

    async fn create_postage_batch(&self, amount: u64, depth: u8) -> TransportResult<String> {
        let mut batches = self.batches.write().unwrap_or_else(PoisonError::into_inner);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&amount.to_be_bytes());
        hasher.update(&[depth]);
        hasher.update(&(batches.len() as u64).to_be_bytes());
        let batch_id = hex::encode(hasher.finalize().as_bytes());
        batches.push(batch_id.clone());
        Ok(batch_id)
    }
}
