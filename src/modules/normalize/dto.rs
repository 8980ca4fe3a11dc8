use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// --- REQUESTS ---

/// Body of `POST /normalize` when the caller supplies signed URLs.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PresignedNormalizeRequest {
    pub download_url: Option<String>,
    pub upload_url: Option<String>,
    /// Output frame rate. Unparsable values fall back to 60.
    #[schema(value_type = Option<f64>)]
    pub fps: Option<Value>,
    /// x264 CRF. Unparsable values fall back to 18.
    #[schema(value_type = Option<f64>)]
    pub crf: Option<Value>,
}

/// Body of `POST /normalize` when results go to the managed bucket.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StorageNormalizeRequest {
    pub source_url: Option<String>,
    /// Object key for the result. Generated under `normalized/` when absent.
    pub dest_path: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub fps: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub crf: Option<Value>,
}

// --- RESPONSES ---

#[derive(Debug, Serialize, ToSchema)]
pub struct PresignedNormalizeResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorageNormalizeResponse {
    pub normalized_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
}
