use std::error::Error as _;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

use crate::args::{Cli, USAGE};
use ytmp3_core::{
    client::InnertubeClient,
    transcoder::FfmpegTranscoder,
    workflow::{RunContext, Workflow, WorkflowConfig},
    Config, VideoId, WorkflowError,
};

pub async fn run<I, T>(args: I) -> Result<PathBuf, WorkflowError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from_args(args)?;
    let id = VideoId::from_url(&cli.url)?;

    let config = Config::load()?;
    let client = InnertubeClient::new().map_err(WorkflowError::Metadata)?;
    let transcoder = FfmpegTranscoder::new(config.ffmpeg_path());

    let ctx = RunContext {
        home: dirs::home_dir(),
        today: chrono::Local::now().date_naive(),
    };

    let workflow = Workflow::new(
        client,
        transcoder,
        WorkflowConfig {
            output_root: config.output.directory,
            target_mime: config.source.target_mime,
        },
    );

    workflow.run(&id, &ctx).await
}

/// Text printed to stderr when a run fails.
pub fn failure_message(error: &WorkflowError) -> String {
    let mut source = error.source();
    while let Some(cause) = source {
        debug!("caused by: {}", cause);
        source = cause.source();
    }

    format!("Error: {}.\n{}", error, USAGE)
}
