use crate::traits::Publisher;
use crate::types::{MediaId, RelayError, Result, StatusId};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.x.com";

/// X (Twitter) API v2 publisher authenticated with a user-context bearer token.
///
/// Requests are sent once; a failed publish is reported, never retried.
pub struct TwitterPublisher {
    client: Client,
    base_url: String,
    bearer_token: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct UploadedMedia {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia<'a>>,
}

#[derive(Debug, Serialize)]
struct TweetMedia<'a> {
    media_ids: Vec<&'a str>,
}

impl TwitterPublisher {
    pub fn new(client: Client, bearer_token: impl Into<String>) -> Self {
        Self::with_base_url(client, bearer_token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: Client, bearer_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        }
    }

    async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn publisher_name(&self) -> String {
        format!("X ({})", self.base_url)
    }

    async fn upload_media(&self, bytes: Vec<u8>, mime: &str) -> Result<MediaId> {
        let size = bytes.len();
        let part = Part::bytes(bytes).file_name("media").mime_str(mime)?;
        let form = Form::new()
            .text("media_category", "tweet_image")
            .part("media", part);

        debug!("Uploading {} bytes of {}", size, mime);
        let response = self
            .client
            .post(format!("{}/2/media/upload", self.base_url))
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await?;

        let media: UploadedMedia = Self::read_data(response).await?;
        debug!("Uploaded media {}", media.id);
        Ok(MediaId(media.id))
    }

    async fn post_status(&self, text: &str, media_ids: &[MediaId]) -> Result<StatusId> {
        let request = TweetRequest {
            text,
            media: (!media_ids.is_empty()).then(|| TweetMedia {
                media_ids: media_ids.iter().map(|m| m.0.as_str()).collect(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/2/tweets", self.base_url))
            .bearer_auth(&self.bearer_token)
            .json(&request)
            .send()
            .await?;

        let tweet: CreatedTweet = Self::read_data(response).await?;
        info!("Posted status {}", tweet.id);
        Ok(StatusId(tweet.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_request_omits_media() {
        let request = TweetRequest { text: "hello", media: None };
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"text":"hello"}"#);
    }

    #[test]
    fn media_request_lists_ids() {
        let request = TweetRequest {
            text: "hello",
            media: Some(TweetMedia { media_ids: vec!["1", "2"] }),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"text":"hello","media":{"media_ids":["1","2"]}}"#
        );
    }
}
