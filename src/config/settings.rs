use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::config::env::{self, EnvKey, Lookup, ProcessEnv};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("unknown NORMALIZE_MODE '{0}' (expected 'presigned' or 'storage')")]
    InvalidMode(String),
}

/// Which destination the service delivers normalized files to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Caller supplies signed GET and PUT URLs.
    Presigned,
    /// Results go to the configured bucket and a public URL is returned.
    Storage,
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "presigned" => Ok(Mode::Presigned),
            "storage" => Ok(Mode::Storage),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub mode: Mode,
    pub ffmpeg_path: String,
    pub temp_dir: PathBuf,
    pub storage: Option<StorageConfig>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &impl Lookup) -> Result<Self, ConfigError> {
        let mode = env::get_or(source, EnvKey::Mode, "presigned").parse::<Mode>()?;

        let storage = match mode {
            Mode::Storage => Some(StorageConfig::from_source(source)?),
            Mode::Presigned => None,
        };

        let temp_dir = env::get(source, EnvKey::TempDir)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            server_port: env::get_parsed(source, EnvKey::ServerPort, 8080),
            mode,
            ffmpeg_path: env::get_or(source, EnvKey::FfmpegPath, "ffmpeg"),
            temp_dir,
            storage,
        })
    }
}

impl StorageConfig {
    fn from_source(source: &impl Lookup) -> Result<Self, ConfigError> {
        let require = |key: EnvKey| {
            let name = key.as_str();
            env::get(source, key).ok_or(ConfigError::Missing(name))
        };

        let endpoint = require(EnvKey::StorageEndpoint)?;
        let bucket = require(EnvKey::StorageBucket)?;
        let access_key = require(EnvKey::StorageAccessKey)?;
        let secret_key = require(EnvKey::StorageSecretKey)?;

        let public_url = env::get(source, EnvKey::StoragePublicUrl)
            .unwrap_or_else(|| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        Ok(Self {
            endpoint,
            bucket,
            access_key,
            secret_key,
            region: env::get_or(source, EnvKey::StorageRegion, "us-east-1"),
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_presigned_mode_on_8080() {
        let source: HashMap<&str, &str> = HashMap::new();
        let config = AppConfig::from_source(&source).unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.mode, Mode::Presigned);
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert!(config.storage.is_none());
    }

    #[test]
    fn unparsable_port_falls_back_to_default() {
        let source = HashMap::from([("PORT", "eighty")]);
        let config = AppConfig::from_source(&source).unwrap();
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn storage_mode_requires_credentials() {
        let source = HashMap::from([
            ("NORMALIZE_MODE", "storage"),
            ("STORAGE_ENDPOINT", "http://minio:9000"),
            ("STORAGE_BUCKET", "videos"),
            ("AWS_ACCESS_KEY_ID", "minio"),
        ]);

        let err = AppConfig::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AWS_SECRET_ACCESS_KEY")));
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let source = HashMap::from([
            ("NORMALIZE_MODE", "storage"),
            ("STORAGE_ENDPOINT", "  "),
        ]);

        let err = AppConfig::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("STORAGE_ENDPOINT")));
    }

    #[test]
    fn storage_mode_derives_public_url_from_endpoint() {
        let source = HashMap::from([
            ("NORMALIZE_MODE", "Storage"),
            ("STORAGE_ENDPOINT", "http://minio:9000/"),
            ("STORAGE_BUCKET", "videos"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
        ]);

        let config = AppConfig::from_source(&source).unwrap();
        let storage = config.storage.unwrap();
        assert_eq!(config.mode, Mode::Storage);
        assert_eq!(storage.public_url, "http://minio:9000/videos");
        assert_eq!(storage.region, "us-east-1");
    }

    #[test]
    fn explicit_public_url_wins() {
        let source = HashMap::from([
            ("NORMALIZE_MODE", "storage"),
            ("STORAGE_ENDPOINT", "http://minio:9000"),
            ("STORAGE_BUCKET", "videos"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
            ("STORAGE_PUBLIC_URL", "https://cdn.example.com/"),
        ]);

        let storage = AppConfig::from_source(&source).unwrap().storage.unwrap();
        assert_eq!(storage.public_url, "https://cdn.example.com");
    }

    #[test]
    fn rejects_unknown_mode() {
        let source = HashMap::from([("NORMALIZE_MODE", "ftp")]);
        let err = AppConfig::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode(m) if m == "ftp"));
    }
}
