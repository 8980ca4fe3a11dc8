use std::path::Path;

use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use tracing::info;
use url::Url;

use crate::common::error::{NormalizeError, Result};
use crate::config::settings::StorageConfig;

/// Handle to the destination bucket. Built once at startup and shared by
/// every job through `AppState`.
#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    pub public_url: Url,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> std::result::Result<Self, url::ParseError> {
        let public_url = Url::parse(&config.public_url)?;
        if public_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(sdk_config);

        info!("✅ Storage client ready for bucket '{}'", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            public_url,
        })
    }

    /// Publicly reachable URL of an object in the bucket. Each key segment
    /// is percent-encoded; `/` keeps separating segments.
    pub fn public_url_for(&self, key: &str) -> String {
        let mut url = self.public_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(key.split('/'));
        }
        url.to_string()
    }

    /// Writes the file at `path` to `key` as `video/mp4`, replacing any
    /// existing object, and returns its public URL.
    pub async fn put_mp4(&self, key: &str, path: &Path) -> Result<String> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| NormalizeError::Upload(format!("Upload failed: {}", e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type("video/mp4")
            .send()
            .await
            .map_err(|e| NormalizeError::Upload(format!("Upload failed: {}", DisplayErrorContext(e))))?;

        Ok(self.public_url_for(key))
    }
}
