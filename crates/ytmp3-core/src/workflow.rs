//! Download-and-transcode workflow
//!
//! Steps run strictly in order and the first failure ends the run:
//! metadata, format selection, stream, output directory, temp file,
//! transcode, temp file removal (best effort).

use crate::client::VideoClient;
use crate::error::{Result, TranscodeError, WorkflowError};
use crate::storage::{self, OutputPaths};
use crate::transcoder::Transcoder;
use crate::video_id::VideoId;

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ambient values a run depends on, resolved by the caller.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Home directory of the invoking user, `None` if it could not be resolved
    pub home: Option<PathBuf>,
    /// Local date used for the output folder name
    pub today: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Output root below the home directory
    pub output_root: PathBuf,
    pub target_mime: String,
}

pub struct Workflow<C, T> {
    client: C,
    transcoder: T,
    config: WorkflowConfig,
}

impl<C: VideoClient, T: Transcoder> Workflow<C, T> {
    pub fn new(client: C, transcoder: T, config: WorkflowConfig) -> Self {
        Self {
            client,
            transcoder,
            config,
        }
    }

    /// Run every step for `id` and return the path of the written MP3.
    pub async fn run(&self, id: &VideoId, ctx: &RunContext) -> Result<PathBuf> {
        let start_time = Instant::now();
        info!("Starting download for: {}", id);

        let video = self
            .client
            .get_video(id)
            .await
            .map_err(WorkflowError::Metadata)?;

        let format = video
            .select_format(&self.config.target_mime)
            .ok_or_else(|| WorkflowError::FormatNotFound {
                mime_type: self.config.target_mime.clone(),
            })?;
        debug!("Selected format itag={} ({})", format.itag, format.mime_type);

        let stream = self
            .client
            .open_stream(&video, format)
            .await
            .map_err(WorkflowError::Stream)?;

        let home = ctx.home.as_deref().ok_or(WorkflowError::HomeDir)?;
        let paths = OutputPaths::new(home, &self.config.output_root, ctx.today, id);

        storage::create_output_dir(&paths.dir)
            .await
            .map_err(WorkflowError::Directory)?;
        debug!("Output directory: {}", paths.dir.display());

        {
            let mut file = storage::create_file(&paths.temp_file)
                .await
                .map_err(WorkflowError::FileCreate)?;

            info!("Downloading audio...");
            storage::write_stream(&mut file, stream)
                .await
                .map_err(WorkflowError::Write)?;
        }

        info!("Trimming & converting audio...");
        let duration_seconds = video.duration.to_string();
        if let Err(e) = self
            .transcoder
            .transcode(&paths.temp_file, &duration_seconds, &paths.final_file)
            .await
        {
            if let TranscodeError::Failed { output, .. } = &e {
                if !output.trim().is_empty() {
                    warn!("ffmpeg output:\n{}", output.trim_end());
                }
            }
            return Err(WorkflowError::Transcode(e));
        }

        if let Err(e) = tokio::fs::remove_file(&paths.temp_file).await {
            debug!("Could not remove {}: {}", paths.temp_file.display(), e);
        }

        info!(
            "Finished {} in {:.1}s",
            paths.final_file.display(),
            start_time.elapsed().as_secs_f32()
        );
        Ok(paths.final_file)
    }
}
