//! YouTube metadata and stream client using the InnerTube player API

use crate::error::ClientError;
use crate::video_id::VideoId;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";
const ANDROID_CLIENT_VERSION: &str = "19.09.37";
const ANDROID_USER_AGENT: &str = "com.google.android.youtube/19.09.37 (Linux; U; Android 12) gzip";

/// Raw bytes of a media stream, in order.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    /// Nominal length in seconds
    pub duration: f64,
    /// Muxed formats first, then adaptive formats, in response order
    pub formats: Vec<StreamFormat>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamFormat {
    pub itag: u32,
    pub mime_type: String,
    #[serde(default)]
    pub audio_channels: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_length: Option<String>,
}

impl StreamFormat {
    pub fn has_audio(&self) -> bool {
        self.audio_channels.is_some_and(|channels| channels > 0)
    }
}

impl VideoMetadata {
    /// First format with audio channels whose MIME type is exactly `mime_type`.
    pub fn select_format(&self, mime_type: &str) -> Option<&StreamFormat> {
        self.formats
            .iter()
            .filter(|format| format.has_audio())
            .find(|format| format.mime_type == mime_type)
    }
}

/// Source of video metadata and media streams.
#[async_trait]
pub trait VideoClient: Send + Sync {
    async fn get_video(&self, id: &VideoId) -> Result<VideoMetadata, ClientError>;

    async fn open_stream(
        &self,
        video: &VideoMetadata,
        format: &StreamFormat,
    ) -> Result<ByteStream, ClientError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    video_details: Option<VideoDetails>,
    #[serde(default)]
    streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    video_id: String,
    #[serde(default)]
    title: String,
    length_seconds: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingData {
    #[serde(default)]
    formats: Vec<StreamFormat>,
    #[serde(default)]
    adaptive_formats: Vec<StreamFormat>,
}

impl PlayerResponse {
    fn into_metadata(self) -> Result<VideoMetadata, ClientError> {
        if let Some(status) = self.playability_status {
            if status.status != "OK" {
                return Err(ClientError::Unplayable(
                    status.reason.unwrap_or(status.status),
                ));
            }
        }

        let details = self
            .video_details
            .ok_or(ClientError::MissingField("videoDetails"))?;
        let duration: f64 = details
            .length_seconds
            .parse()
            .map_err(|_| ClientError::InvalidDuration(details.length_seconds.clone()))?;

        let streaming = self.streaming_data.unwrap_or_default();
        let mut formats = streaming.formats;
        formats.extend(streaming.adaptive_formats);

        Ok(VideoMetadata {
            id: details.video_id,
            title: details.title,
            duration,
            formats,
        })
    }
}

/// Client speaking to YouTube as the Android app, which returns direct
/// (unciphered) stream URLs.
#[derive(Debug, Clone)]
pub struct InnertubeClient {
    http: Client,
}

impl InnertubeClient {
    pub fn new() -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .user_agent(ANDROID_USER_AGENT)
            .build()?;
        Ok(Self { http })
    }

    fn player_request(id: &VideoId) -> serde_json::Value {
        serde_json::json!({
            "videoId": id.as_str(),
            "context": {
                "client": {
                    "hl": "en",
                    "gl": "US",
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "androidSdkVersion": 31,
                    "userAgent": ANDROID_USER_AGENT,
                    "platform": "MOBILE"
                }
            },
            "playbackContext": {
                "contentPlaybackContext": {
                    "html5Preference": "HTML5_PREF_WANTS"
                }
            },
            "racyCheckOk": true,
            "contentCheckOk": true
        })
    }
}

#[async_trait]
impl VideoClient for InnertubeClient {
    async fn get_video(&self, id: &VideoId) -> Result<VideoMetadata, ClientError> {
        info!("Fetching metadata for: {}", id);

        let response = self
            .http
            .post(PLAYER_ENDPOINT)
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-YouTube-Client-Name", "3")
            .header("X-YouTube-Client-Version", ANDROID_CLIENT_VERSION)
            .json(&Self::player_request(id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let player: PlayerResponse = response.json().await?;
        let metadata = player.into_metadata()?;

        debug!(
            "Resolved: {} ({}s, {} formats)",
            metadata.title,
            metadata.duration,
            metadata.formats.len()
        );
        Ok(metadata)
    }

    async fn open_stream(
        &self,
        video: &VideoMetadata,
        format: &StreamFormat,
    ) -> Result<ByteStream, ClientError> {
        let url = format
            .url
            .as_deref()
            .ok_or(ClientError::NoStreamUrl { itag: format.itag })?;

        debug!(
            "Opening stream itag={} for {} ({} bytes)",
            format.itag,
            video.id,
            format.content_length.as_deref().unwrap_or("unknown")
        );

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        Ok(response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed())
    }
}
