//! ytmp3-core: download a YouTube video's AAC audio stream and transcode it to MP3

pub mod client;
pub mod config;
pub mod error;
pub mod storage;
pub mod transcoder;
pub mod video_id;
pub mod workflow;

pub use config::Config;
pub use error::{Result, WorkflowError};
pub use video_id::VideoId;
