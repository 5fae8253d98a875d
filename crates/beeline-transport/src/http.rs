use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::config::GatewayConfig;
use crate::endpoint::{endpoints, StampReceipt, UploadReceipt, FILE_NAME_PARAM, POSTAGE_BATCH_HEADER};
use crate::error::{TransportError, TransportResult};
use crate::transport::{FetchResponse, Transport, Upload, UploadResponse};

/// [`Transport`] over a gateway's HTTP API.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Connect to the gateway at `base_url`. Trailing slashes are ignored.
    pub fn new(base_url: impl Into<String>) -> TransportResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &GatewayConfig) -> TransportResult<Self> {
        Self::new(config.gateway_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, hash: &str) -> TransportResult<FetchResponse> {
        let url = self.url(&format!("{}/{hash}", endpoints::BZZ));
        tracing::debug!(%url, "fetching");
        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        let content_type = header_value(response.headers(), CONTENT_TYPE);
        let content_disposition = header_value(response.headers(), CONTENT_DISPOSITION);
        let body = response.bytes().await?.to_vec();
        if !(200..300).contains(&status) {
            tracing::warn!(hash, status, "gateway refused download");
        }
        Ok(FetchResponse {
            status,
            body,
            content_type,
            content_disposition,
        })
    }

    async fn upload(&self, upload: Upload) -> TransportResult<UploadResponse> {
        let url = self.url(endpoints::BZZ);
        tracing::debug!(%url, file_name = %upload.file_name, mime = %upload.mime_type, "uploading");
        let response = self
            .client
            .post(&url)
            .query(&[(FILE_NAME_PARAM, upload.file_name.as_str())])
            .header(CONTENT_TYPE, upload.mime_type.as_str())
            .header(POSTAGE_BATCH_HEADER, upload.batch_id.as_str())
            .body(upload.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!(status = status.as_u16(), %message, "gateway refused upload");
            return Ok(UploadResponse::rejected(status.as_u16(), message));
        }
        let receipt: UploadReceipt = serde_json::from_slice(&body)
            .map_err(|e| TransportError::MalformedResponse(format!("upload receipt: {e}")))?;
        Ok(UploadResponse::accepted(status.as_u16(), receipt.reference))
    }

    async fn create_postage_batch(&self, amount: u64, depth: u8) -> TransportResult<String> {
        let url = self.url(&format!("{}/{amount}/{depth}", endpoints::STAMPS));
        tracing::debug!(%url, "buying postage batch");
        let response = self.client.post(&url).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        let receipt: StampReceipt = serde_json::from_slice(&body)
            .map_err(|e| TransportError::MalformedResponse(format!("stamp receipt: {e}")))?;
        Ok(receipt.batch_id)
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::body::{Body, Bytes};
    use axum::extract::{Path, Query, State};
    use axum::http::{header, HeaderMap as AxumHeaders, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use beeline_types::LogicalKind;

    #[derive(Clone, Debug)]
    struct Received {
        file_name: Option<String>,
        content_type: Option<String>,
        batch_id: Option<String>,
        body: Vec<u8>,
    }

    type Log = Arc<Mutex<Vec<Received>>>;

    async fn download(Path(hash): Path<String>) -> Response {
        match hash.as_str() {
            "test" => Response::builder()
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"key":"value","a":2}"#))
                .unwrap(),
            "sheet" => Response::builder()
                .header(header::CONTENT_DISPOSITION, "inline; filename=\"sheet.csv\"")
                .body(Body::from("a,b\n1,2\n"))
                .unwrap(),
            "bare" => Response::new(Body::from("plain")),
            _ => (StatusCode::NOT_FOUND, r#"{"code":404,"message":"Not Found"}"#).into_response(),
        }
    }

    async fn upload(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
        headers: AxumHeaders,
        body: Bytes,
    ) -> Response {
        let text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
        let received = Received {
            file_name: params.get(FILE_NAME_PARAM).cloned(),
            content_type: text("content-type"),
            batch_id: text(POSTAGE_BATCH_HEADER),
            body: body.to_vec(),
        };
        log.lock().unwrap().push(received);
        if body.as_ref() == b"reject me" {
            return (StatusCode::PAYMENT_REQUIRED, "batch not usable").into_response();
        }
        if body.as_ref() == b"garble" {
            return (StatusCode::CREATED, "not json").into_response();
        }
        (StatusCode::CREATED, Json(serde_json::json!({"reference": "c0ffee"}))).into_response()
    }

    async fn stamp(Path((amount, depth)): Path<(u64, u8)>) -> Response {
        if depth < 17 {
            return (StatusCode::BAD_REQUEST, "invalid depth").into_response();
        }
        Json(serde_json::json!({"batchID": format!("batch-{amount}-{depth}")})).into_response()
    }

    async fn spawn_gateway() -> (HttpTransport, Log) {
        let log = Log::default();
        let app = Router::new()
            .route("/bzz", post(upload))
            .route("/bzz/:hash", get(download))
            .route("/stamps/:amount/:depth", post(stamp))
            .with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (HttpTransport::new(format!("http://{addr}/")).unwrap(), log)
    }

    fn upload_of(body: &[u8]) -> Upload {
        Upload {
            body: body.to_vec(),
            mime_type: "text/csv".into(),
            file_name: "data.csv".into(),
            batch_id: "ab".repeat(32),
        }
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpTransport::new("ftp://localhost:1633"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:1633///").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:1633");
        assert_eq!(transport.url("/bzz"), "http://localhost:1633/bzz");
    }

    #[tokio::test]
    async fn fetch_carries_headers() {
        let (transport, _) = spawn_gateway().await;

        let json = transport.fetch("test").await.unwrap();
        assert_eq!(json.status, 200);
        assert_eq!(json.body, br#"{"key":"value","a":2}"#);
        assert_eq!(json.metadata().resolve(), LogicalKind::Json);

        let sheet = transport.fetch("sheet").await.unwrap();
        assert_eq!(sheet.content_type, None);
        assert_eq!(sheet.metadata().resolve(), LogicalKind::Csv);

        let bare = transport.fetch("bare").await.unwrap();
        assert_eq!(bare.metadata().resolve(), LogicalKind::Raw);
    }

    #[tokio::test]
    async fn fetch_reports_missing_as_status() {
        let (transport, _) = spawn_gateway().await;
        let missing = transport.fetch("nope").await.unwrap();
        assert_eq!(missing.status, 404);
        assert!(!missing.is_success());
    }

    #[tokio::test]
    async fn upload_sends_name_type_and_batch() {
        let (transport, log) = spawn_gateway().await;
        let response = transport.upload(upload_of(b"a,b\n1,2\n")).await.unwrap();
        assert_eq!(response.reference.as_deref(), Some("c0ffee"));

        let received = log.lock().unwrap()[0].clone();
        assert_eq!(received.file_name.as_deref(), Some("data.csv"));
        assert_eq!(received.content_type.as_deref(), Some("text/csv"));
        assert_eq!(received.batch_id, Some("ab".repeat(32)));
        assert_eq!(received.body, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn upload_rejection_is_a_value() {
        let (transport, _) = spawn_gateway().await;
        let response = transport.upload(upload_of(b"reject me")).await.unwrap();
        assert_eq!(response.status, 402);
        assert_eq!(response.message, "batch not usable");
        assert!(response.reference.is_none());
    }

    #[tokio::test]
    async fn upload_with_unreadable_receipt() {
        let (transport, _) = spawn_gateway().await;
        let err = transport.upload(upload_of(b"garble")).await.unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn postage_batch_roundtrip() {
        let (transport, _) = spawn_gateway().await;
        let batch = transport.create_postage_batch(10_000_000, 20).await.unwrap();
        assert_eq!(batch, "batch-10000000-20");

        let err = transport.create_postage_batch(1, 2).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
        assert!(matches!(
            transport.fetch("test").await,
            Err(TransportError::Http(_))
        ));
    }
}
