use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A candidate post as returned by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub url: String,
    pub shortlink: String,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        shortlink: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            shortlink: shortlink.into(),
        }
    }
}

/// How an eligible post is republished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// The source URL is an image file: download, re-upload, no link in the text.
    Media,
    /// The source URL is on an embeddable host: append it so the target renders a preview.
    Embed,
}

impl PostKind {
    pub fn embeds_preview(self) -> bool {
        matches!(self, PostKind::Embed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusId(pub String);

/// Outcome of a successful republish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPost {
    pub source_id: String,
    pub status_id: StatusId,
    pub text: String,
    pub media_ids: Vec<MediaId>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Format,
    Download,
    Decode,
    Upload,
    Publish,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            FailureReason::Format => "format",
            FailureReason::Download => "download",
            FailureReason::Decode => "decode",
            FailureReason::Upload => "upload",
            FailureReason::Publish => "publish",
        };
        f.write_str(code)
    }
}

/// A single post that could not be republished. Never aborts a cycle.
#[derive(Debug, Clone)]
pub struct PostFailure {
    pub source_id: String,
    pub reason: FailureReason,
    pub message: String,
}

impl PostFailure {
    pub fn new(source_id: &str, reason: FailureReason, message: impl fmt::Display) -> Self {
        Self {
            source_id: source_id.to_string(),
            reason,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for PostFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post {} failed at {}: {}", self.source_id, self.reason, self.message)
    }
}

pub type PublishOutcome = std::result::Result<PublishedPost, PostFailure>;

/// Summary of one fetch -> select -> publish -> persist cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub fetched: usize,
    pub selected: usize,
    pub published: Vec<PublishedPost>,
    pub failures: Vec<PostFailure>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "reddit-relay/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 5,
            max_redirects: 5,
        }
    }
}

/// Relay policy: what to fetch, how to select and format, how long to wait.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub category: String,
    pub tag: String,
    pub batch_size: usize,
    pub post_delay_seconds: u64,
    pub cycle_delay_seconds: u64,
    pub media_delay_seconds: u64,
    pub dedup_max_size: usize,
    pub dedup_retain: usize,
    pub max_text_length: usize,
    pub embed_hosts: Vec<String>,
    pub jpeg_quality: u8,
    pub dedup_path: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            category: "aww".to_string(),
            tag: "aww".to_string(),
            batch_size: 5,
            post_delay_seconds: 60,
            cycle_delay_seconds: 3600,
            media_delay_seconds: 2,
            dedup_max_size: 100,
            dedup_retain: 50,
            max_text_length: crate::formatter::DEFAULT_MAX_LENGTH,
            embed_hosts: vec!["imgur".to_string(), "gfycat".to_string()],
            jpeg_quality: 90,
            dedup_path: PathBuf::from("forwarded.txt"),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dedup_retain > self.dedup_max_size {
            return Err(RelayError::Config(format!(
                "dedup retain count {} exceeds dedup max size {}",
                self.dedup_retain, self.dedup_max_size
            )));
        }
        if self.batch_size == 0 {
            return Err(RelayError::Config("batch size must be at least 1".to_string()));
        }
        if self.max_text_length <= crate::formatter::TRUNCATION_MARGIN {
            return Err(RelayError::Config(format!(
                "max text length must exceed the {}-character truncation margin",
                crate::formatter::TRUNCATION_MARGIN
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RelayError::Config("jpeg quality must be between 1 and 100".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Response(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
