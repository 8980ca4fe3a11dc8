use tracing::{Instrument, info, info_span};

use super::params::{PresignedJob, StorageJob};
use crate::common::error::{NormalizeError, Result};
use crate::common::scratch::JobWorkspace;
use crate::state::AppState;
use crate::workers::transcoder::TranscodeProfile;

pub struct NormalizeService;

impl NormalizeService {
    /// Mode A: signed GET → transcode → signed PUT.
    pub async fn run_presigned(state: AppState, job: PresignedJob) -> Result<()> {
        let workspace = JobWorkspace::new(&state.config.temp_dir);
        let span = info_span!("job", id = %workspace.id(), mode = "presigned");

        let result = async {
            Self::fetch_and_transcode(&state, &workspace, &job.download_url, &job.profile).await?;
            state.transfer.upload(&job.upload_url, workspace.output()).await?;
            info!("✅ Job completed");
            Ok::<_, NormalizeError>(())
        }
        .instrument(span)
        .await;

        workspace.release();
        result
    }

    /// Mode B: GET → transcode → PutObject. Returns the object's public URL.
    pub async fn run_to_storage(state: AppState, job: StorageJob) -> Result<String> {
        let storage = state
            .storage
            .clone()
            .ok_or_else(|| NormalizeError::Upload("Object storage is not configured".to_string()))?;

        let workspace = JobWorkspace::new(&state.config.temp_dir);
        let span = info_span!("job", id = %workspace.id(), mode = "storage", key = %job.dest_key);

        let result = async {
            Self::fetch_and_transcode(&state, &workspace, &job.source_url, &job.profile).await?;
            let url = storage.put_mp4(&job.dest_key, workspace.output()).await?;
            info!("✅ Job completed: {}", url);
            Ok::<_, NormalizeError>(url)
        }
        .instrument(span)
        .await;

        workspace.release();
        result
    }

    async fn fetch_and_transcode(
        state: &AppState,
        workspace: &JobWorkspace,
        source: &str,
        profile: &TranscodeProfile,
    ) -> Result<()> {
        info!("⬇️ Downloading source");
        state.transfer.download(source, workspace.input()).await?;

        state
            .transcoder
            .transcode(profile, workspace.input(), workspace.output())
            .await
    }
}
