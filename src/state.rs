use anyhow::Context;

use crate::config::settings::AppConfig;
use crate::infrastructure::http::transfer::TransferClient;
use crate::infrastructure::storage::s3::StorageService;
use crate::workers::transcoder::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub transfer: TransferClient,
    pub transcoder: Transcoder,
    /// Present only in storage mode.
    pub storage: Option<StorageService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        transfer: TransferClient,
        transcoder: Transcoder,
        storage: Option<StorageService>,
    ) -> Self {
        Self {
            config,
            transfer,
            transcoder,
            storage,
        }
    }

    /// Builds every collaborator from configuration. Called once at startup.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("normalizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let storage = config
            .storage
            .as_ref()
            .map(StorageService::new)
            .transpose()
            .context("Invalid STORAGE_PUBLIC_URL")?;
        let transcoder = Transcoder::new(config.ffmpeg_path.clone());

        Ok(Self::new(config, TransferClient::new(http), transcoder, storage))
    }
}
