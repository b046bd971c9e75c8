//! Video identifier extraction from YouTube URLs

use crate::error::WorkflowError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"v=([a-zA-Z0-9_-]*)").expect("valid video id pattern"))
}

/// A non-empty YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the identifier from the first `v=` parameter in `url`.
    ///
    /// The match is not anchored to a query string, so any `v=<token>` in
    /// the argument counts. An empty token is rejected.
    pub fn from_url(url: &str) -> Result<Self, WorkflowError> {
        let id = id_pattern()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty())
            .ok_or(WorkflowError::IdExtraction)?;

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_watch_url_id() {
        let id = VideoId::from_url("https://www.youtube.com/watch?v=INbQpAoaWSw").unwrap();
        assert_eq!(id.as_str(), "INbQpAoaWSw");
    }

    #[test]
    fn test_stops_at_next_parameter() {
        let id = VideoId::from_url("https://www.youtube.com/watch?v=a_b-C9&t=42s").unwrap();
        assert_eq!(id.as_str(), "a_b-C9");

        let id = VideoId::from_url("https://music.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_rejects_missing_parameter() {
        assert!(matches!(
            VideoId::from_url("https://youtu.be/dQw4w9WgXcQ"),
            Err(WorkflowError::IdExtraction)
        ));
        assert!(VideoId::from_url("not a url").is_err());
        assert!(VideoId::from_url("").is_err());
    }

    #[test]
    fn test_rejects_empty_token() {
        assert!(matches!(
            VideoId::from_url("https://www.youtube.com/watch?v=&t=1"),
            Err(WorkflowError::IdExtraction)
        ));
        assert!(VideoId::from_url("https://www.youtube.com/watch?v=%20abc").is_err());
    }
}
