//! Error types for ytmp3-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Every way a run can fail. `Display` is the user-facing context line; the
/// underlying cause, where there is one, is available through `source()`.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Missing required arguments")]
    Usage,

    #[error("No video ID in YouTube link")]
    IdExtraction,

    #[error("Unable to get YouTube link")]
    Metadata(#[source] ClientError),

    #[error("No audio channel for YouTube link")]
    FormatNotFound { mime_type: String },

    #[error("Unable to get stream for YouTube link")]
    Stream(#[source] ClientError),

    #[error("Unable to get current user")]
    HomeDir,

    #[error("Unable to create dir on Desktop")]
    Directory(#[source] std::io::Error),

    #[error("Unable to create audio file")]
    FileCreate(#[source] std::io::Error),

    #[error("Error writing audio file")]
    Write(#[source] std::io::Error),

    #[error("Error trimming audio file")]
    Transcode(#[source] TranscodeError),

    #[error("Unable to load configuration")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("video is not playable: {0}")]
    Unplayable(String),

    #[error("player response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid video duration: {0}")]
    InvalidDuration(String),

    #[error("format {itag} has no direct stream URL")]
    NoStreamUrl { itag: u32 },
}

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg failed with exit code: {code:?}")]
    Failed { code: Option<i32>, output: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
