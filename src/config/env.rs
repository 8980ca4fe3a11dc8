use std::collections::HashMap;
use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    Mode,
    FfmpegPath,
    TempDir,
    StorageEndpoint,
    StorageBucket,
    StorageAccessKey,
    StorageSecretKey,
    StorageRegion,
    StoragePublicUrl,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::Mode => "NORMALIZE_MODE",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TempDir => "NORMALIZE_TMP_DIR",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageBucket => "STORAGE_BUCKET",
            EnvKey::StorageAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StoragePublicUrl => "STORAGE_PUBLIC_URL",
        }
    }
}

/// Where configuration values come from. The process environment in
/// production, a plain map in tests.
pub trait Lookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl Lookup for HashMap<&str, &str> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

/// Blank values count as unset.
pub fn get(source: &impl Lookup, key: EnvKey) -> Option<String> {
    source
        .lookup(key.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn get_or(source: &impl Lookup, key: EnvKey, default: &str) -> String {
    get(source, key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(source: &impl Lookup, key: EnvKey, default: T) -> T {
    match get(source, key) {
        Some(val) => val.parse::<T>().unwrap_or(default),
        None => default,
    }
}
