use std::path::Path;

use reqwest::{Body, Client, header};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::info;
use url::Url;

use crate::common::error::{NormalizeError, Result};

/// Moves bytes between signed URLs and the job's local files. Never deletes
/// anything; removal belongs to the job workspace.
#[derive(Clone)]
pub struct TransferClient {
    http: Client,
}

impl TransferClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// GETs `source` and streams the body into `dest`. Returns the byte count.
    pub async fn download(&self, source: &str, dest: &Path) -> Result<u64> {
        let url = Url::parse(source)
            .map_err(|e| NormalizeError::SourceFetch(format!("Failed to download: {}", e)))?;

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NormalizeError::SourceFetch(format!("Failed to download: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NormalizeError::SourceFetch(format!(
                "Failed to download: {}",
                status
            )));
        }

        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| NormalizeError::SourceFetch(format!("Failed to download: {}", e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!("⬇️ Downloaded {} bytes", written);
        Ok(written)
    }

    /// PUTs the file at `src` to a pre-authorized upload URL as `video/mp4`.
    /// The body is streamed from disk; the length comes from file metadata.
    pub async fn upload(&self, target: &str, src: &Path) -> Result<()> {
        let url = Url::parse(target)
            .map_err(|e| NormalizeError::Upload(format!("Upload failed: {}", e)))?;

        let file = File::open(src).await?;
        let length = file.metadata().await?.len();
        let body = Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .http
            .put(url)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_LENGTH, length.to_string())
            .body(body)
            .send()
            .await
            .map_err(|e| NormalizeError::Upload(format!("Upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NormalizeError::Upload(
                format!("Upload failed: {} {}", status, text).trim_end().to_string(),
            ));
        }

        info!("⬆️ Uploaded {} bytes", length);
        Ok(())
    }
}
