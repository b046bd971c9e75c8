//! Trim and MP3 transcode using FFmpeg

use crate::error::TranscodeError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Turns a downloaded raw stream into the final MP3.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Trim `input` to `duration_seconds` and write MP3 audio to `output`,
    /// overwriting it if present.
    async fn transcode(
        &self,
        input: &Path,
        duration_seconds: &str,
        output: &Path,
    ) -> Result<(), TranscodeError>;
}

#[derive(Debug)]
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    fn args(input: &Path, duration_seconds: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(13);
        args.extend(["-hide_banner", "-y"].map(OsString::from));
        args.push("-i".into());
        args.push(input.into());
        // Trim to the nominal duration
        args.push("-t".into());
        args.push(duration_seconds.into());
        args.extend(["-c", "copy", "-vn", "-acodec", "libmp3lame"].map(OsString::from));
        args.push(output.into());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        duration_seconds: &str,
        output: &Path,
    ) -> Result<(), TranscodeError> {
        info!("Transcoding {} to MP3 ({}s)", input.display(), duration_seconds);

        let result = Command::new(&self.ffmpeg_path)
            .args(Self::args(input, duration_seconds, output))
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.ffmpeg_path.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&result.stderr));
            return Err(TranscodeError::Failed {
                code: result.status.code(),
                output: combined,
            });
        }

        debug!("Transcoded to: {}", output.display());
        Ok(())
    }
}
