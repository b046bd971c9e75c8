//! Configuration management for ytmp3
//!
//! There is no configuration file. Defaults can be overridden through
//! `YTMP3_`-prefixed environment variables, nested keys separated by `__`
//! (for example `YTMP3_PATHS__FFMPEG=/opt/ffmpeg/bin/ffmpeg`).

use crate::error::ConfigError;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// MIME signature of the only stream format ytmp3 downloads (AAC-LC in MP4).
pub const TARGET_MIME_TYPE: &str = "audio/mp4; codecs=\"mp4a.40.2\"";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root, relative to the home directory
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Exact MIME type of the stream format to download
    pub target_mime: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig { ffmpeg: None },
            output: OutputConfig {
                directory: PathBuf::from("Desktop").join("YTVideos"),
            },
            source: SourceConfig {
                target_mime: TARGET_MIME_TYPE.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from defaults and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::new().merge(Env::prefixed("YTMP3_").split("__")))
    }

    fn from_figment(overrides: Figment) -> Result<Self, ConfigError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(overrides)
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.output.directory.is_absolute() {
            return Err(ConfigError::InvalidValue(format!(
                "output.directory must be relative to the home directory, got {}",
                self.output.directory.display()
            )));
        }
        if self.source.target_mime.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "source.target_mime must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get FFmpeg path, auto-detecting if not configured.
    ///
    /// Falls back to the bare program name so a missing binary surfaces as a
    /// spawn failure at transcode time rather than up front.
    pub fn ffmpeg_path(&self) -> PathBuf {
        if let Some(ref path) = self.paths.ffmpeg {
            path.clone()
        } else {
            which::which("ffmpeg").unwrap_or_else(|_| PathBuf::from("ffmpeg"))
        }
    }
}
