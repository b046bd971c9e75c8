use clap::Parser;
use std::ffi::OsString;
use ytmp3_core::WorkflowError;

pub const USAGE: &str = "Usage: ytmp3 <YouTubeLink>\n\
                         Example: ytmp3 https://www.youtube.com/watch?v=INbQpAoaWSw\n\n";

#[derive(Parser, Debug)]
#[command(name = "ytmp3")]
#[command(about = "Download a YouTube video's audio track as MP3")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// YouTube watch URL containing a `v=<id>` parameter
    #[arg(value_name = "YouTubeLink", allow_hyphen_values = true)]
    pub url: String,
}

impl Cli {
    /// Parse `args` (program name first). Anything other than exactly one
    /// argument is a usage error.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, WorkflowError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // Counted before clap so `--` cannot pass as an extra argument.
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.len() != 2 {
            return Err(WorkflowError::Usage);
        }
        Cli::try_parse_from(args).map_err(|_| WorkflowError::Usage)
    }
}
