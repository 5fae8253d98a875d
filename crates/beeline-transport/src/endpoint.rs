use serde::{Deserialize, Serialize};

/// Gateway paths, relative to the gateway base URL.
pub mod endpoints {
    /// `GET /bzz/{hash}` downloads, `POST /bzz` uploads.
    pub const BZZ: &str = "/bzz";
    /// `POST /stamps/{amount}/{depth}` buys a postage batch.
    pub const STAMPS: &str = "/stamps";
}

/// Header carrying the postage batch an upload is paid from.
pub const POSTAGE_BATCH_HEADER: &str = "swarm-postage-batch-id";

/// Query parameter carrying the upload's file name.
pub const FILE_NAME_PARAM: &str = "file_name";

/// Batch id sent when the caller supplies none.
pub const NULL_BATCH_ID: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Body of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub reference: String,
}

/// Body of a successful postage batch purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampReceipt {
    #[serde(rename = "batchID")]
    pub batch_id: String,
}
