use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{error, info};

use crate::common::error::{NormalizeError, Result};

pub const DEFAULT_FPS: &str = "60";
pub const DEFAULT_CRF: &str = "18";
const AUDIO_SAMPLE_RATE: &str = "48000";

/// Encoder settings for one job. Everything else in the output profile
/// (H.264 high / yuv420p / faststart / AAC 48k) is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeProfile {
    pub fps: String,
    pub crf: String,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS.to_string(),
            crf: DEFAULT_CRF.to_string(),
        }
    }
}

impl TranscodeProfile {
    /// Full ffmpeg argument list turning `input` into a web-ready MP4 at `output`.
    ///
    /// Only the first video stream is kept. Audio is mapped with `0:a?` so a
    /// source without audio still produces a valid video-only file.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(32);
        let mut push = |s: &str| args.push(OsString::from(s));

        push("-hide_banner");
        push("-loglevel");
        push("error");
        push("-y");
        push("-i");
        args.push(input.as_os_str().to_owned());

        let tail = [
            "-map", "0:v:0",
            "-map", "0:a?",
            "-vf", format!("fps={}", self.fps).as_str(),
            "-vsync", "cfr",
            "-c:v", "libx264",
            "-preset", "veryfast",
            "-crf", self.crf.as_str(),
            "-profile:v", "high",
            "-pix_fmt", "yuv420p",
            "-movflags", "+faststart",
            "-c:a", "aac",
            "-ar", AUDIO_SAMPLE_RATE,
        ]
        .map(OsString::from);
        args.extend(tail);

        args.push(output.as_os_str().to_owned());
        args
    }
}

/// Runs the external encoder. The job awaits the child process; other jobs
/// keep running on the runtime meanwhile. Dropping the job kills the child,
/// so a cancelled request cannot leave an encoder writing into a released
/// workspace.
#[derive(Clone, Debug)]
pub struct Transcoder {
    binary: String,
}

impl Transcoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub async fn transcode(&self, profile: &TranscodeProfile, input: &Path, output: &Path) -> Result<()> {
        info!(
            "🎥 Transcoding {} (fps={}, crf={})",
            input.display(),
            profile.fps,
            profile.crf
        );

        let result = Command::new(&self.binary)
            .args(profile.args(input, output))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                NormalizeError::Transcode(format!("Failed to start {}: {}", self.binary, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.binary, result.status)
            } else {
                stderr
            };
            error!("❌ Encoder failed: {}", message);
            return Err(NormalizeError::Transcode(message));
        }

        Ok(())
    }
}
