use serde_json::Value;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use super::dto::{PresignedNormalizeRequest, StorageNormalizeRequest};
use crate::common::error::{NormalizeError, Result};
use crate::workers::transcoder::{DEFAULT_CRF, DEFAULT_FPS, TranscodeProfile};

const GENERATED_KEY_PREFIX: &str = "normalized";

/// A validated Mode A job: signed source and destination URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct PresignedJob {
    pub download_url: String,
    pub upload_url: String,
    pub profile: TranscodeProfile,
}

/// A validated Mode B job: source URL and the bucket key to write.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageJob {
    pub source_url: String,
    pub dest_key: String,
    pub profile: TranscodeProfile,
}

impl PresignedNormalizeRequest {
    pub fn validate(self) -> Result<PresignedJob> {
        let download_url = required(self.download_url, "download_url")?;
        let upload_url = required(self.upload_url, "upload_url")?;
        require_url(&download_url, "download_url")?;
        require_url(&upload_url, "upload_url")?;

        Ok(PresignedJob {
            download_url,
            upload_url,
            profile: profile_from(self.fps.as_ref(), self.crf.as_ref()),
        })
    }
}

impl StorageNormalizeRequest {
    pub fn validate(self) -> Result<StorageJob> {
        let source_url = required(self.source_url, "source_url")?;
        require_url(&source_url, "source_url")?;

        let dest_key = self
            .dest_path
            .as_deref()
            .map(|p| p.trim().trim_start_matches('/'))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_key);

        Ok(StorageJob {
            source_url,
            dest_key,
            profile: profile_from(self.fps.as_ref(), self.crf.as_ref()),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NormalizeError::InvalidRequest(format!("{} is required", field)))
}

/// Rejects references the transfer stage could never resolve, before any
/// bytes move.
fn require_url(value: &str, field: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| NormalizeError::InvalidRequest(format!("{} is not a valid URL: {}", field, e)))
}

fn profile_from(fps: Option<&Value>, crf: Option<&Value>) -> TranscodeProfile {
    TranscodeProfile {
        fps: numeric_override(fps, |n| n > 0.0).unwrap_or_else(|| DEFAULT_FPS.to_string()),
        crf: numeric_override(crf, |_| true).unwrap_or_else(|| DEFAULT_CRF.to_string()),
    }
}

/// Accepts JSON numbers and numeric strings that parse to a finite value
/// passing `accept`, keeping the caller's spelling. Anything else is `None`.
/// Numbers keep their source text, so `1e400` arrives here and is
/// rejected as non-finite.
fn numeric_override(value: Option<&Value>, accept: impl Fn(f64) -> bool) -> Option<String> {
    let (text, parsed) = match value? {
        Value::Number(n) => (n.to_string(), n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            (s.to_string(), s.parse::<f64>().ok()?)
        }
        _ => return None,
    };

    (parsed.is_finite() && accept(parsed)).then_some(text)
}

/// `normalized/<unix millis>-<random>.mp4`
pub fn generate_key() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}/{}-{}.mp4", GENERATED_KEY_PREFIX, millis, &suffix[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn presigned(body: Value) -> Result<PresignedJob> {
        serde_json::from_value::<PresignedNormalizeRequest>(body)
            .unwrap()
            .validate()
    }

    fn storage(body: Value) -> Result<StorageJob> {
        serde_json::from_value::<StorageNormalizeRequest>(body)
            .unwrap()
            .validate()
    }

    #[test]
    fn presigned_requires_download_url() {
        let err = presigned(json!({ "upload_url": "https://example/put" })).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "download_url is required");
    }

    #[test]
    fn presigned_requires_upload_url() {
        let err = presigned(json!({ "download_url": "https://example/a.webm" })).unwrap_err();
        assert_eq!(err.to_string(), "upload_url is required");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let err = presigned(json!({ "download_url": "", "upload_url": "https://example/put" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "download_url is required");
    }

    #[test]
    fn presigned_defaults_rate_and_quality() {
        let job = presigned(json!({
            "download_url": "https://example/a.webm",
            "upload_url": "https://example/put"
        }))
        .unwrap();

        assert_eq!(job.profile, TranscodeProfile::default());
        assert_eq!(job.profile.fps, "60");
        assert_eq!(job.profile.crf, "18");
    }

    #[test]
    fn numeric_overrides_keep_caller_spelling() {
        let job = presigned(json!({
            "download_url": "https://example/a.webm",
            "upload_url": "https://example/put",
            "fps": 29.97,
            "crf": "23"
        }))
        .unwrap();

        assert_eq!(job.profile.fps, "29.97");
        assert_eq!(job.profile.crf, "23");
    }

    #[test]
    fn garbage_overrides_fall_back_to_defaults() {
        for bad in [json!("not-a-number"), json!(null), json!(true), json!([30]), json!("NaN"), json!("inf")] {
            let job = presigned(json!({
                "download_url": "https://example/a.webm",
                "upload_url": "https://example/put",
                "fps": bad.clone(),
                "crf": bad
            }))
            .unwrap();

            assert_eq!(job.profile, TranscodeProfile::default());
        }
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_defaults() {
        let body = r#"{
            "download_url": "https://example/a.webm",
            "upload_url": "https://example/put",
            "fps": 1e400,
            "crf": -1e400
        }"#;

        let job = serde_json::from_str::<PresignedNormalizeRequest>(body)
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(job.profile, TranscodeProfile::default());
    }

    #[test]
    fn malformed_upload_url_is_rejected_up_front() {
        let err = presigned(json!({
            "download_url": "https://example/a.webm",
            "upload_url": "example/put"
        }))
        .unwrap_err();

        assert!(matches!(err, NormalizeError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("upload_url is not a valid URL"));
    }

    #[test]
    fn malformed_source_url_is_rejected_up_front() {
        let err = storage(json!({ "source_url": "clip.webm" })).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("source_url is not a valid URL"));
    }

    #[test]
    fn non_positive_frame_rate_falls_back() {
        let job = presigned(json!({
            "download_url": "https://example/a.webm",
            "upload_url": "https://example/put",
            "fps": 0,
            "crf": 0
        }))
        .unwrap();

        assert_eq!(job.profile.fps, "60");
        assert_eq!(job.profile.crf, "0");
    }

    #[test]
    fn storage_requires_source_url() {
        let err = storage(json!({ "dest_path": "a.mp4" })).unwrap_err();
        assert_eq!(err.to_string(), "source_url is required");
    }

    #[test]
    fn storage_generates_key_when_dest_missing() {
        let job = storage(json!({ "source_url": "https://example/clip.webm" })).unwrap();
        assert!(job.dest_key.starts_with("normalized/"));
        assert!(job.dest_key.ends_with(".mp4"));
    }

    #[test]
    fn storage_keeps_dest_path_without_leading_slash() {
        let job = storage(json!({
            "source_url": "https://example/clip.webm",
            "dest_path": "/renders/final.mp4"
        }))
        .unwrap();
        assert_eq!(job.dest_key, "renders/final.mp4");
    }

    #[test]
    fn generated_keys_do_not_collide() {
        let a = generate_key();
        let b = generate_key();
        assert_ne!(a, b);
    }
}
