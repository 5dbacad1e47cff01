use crate::fetcher::Fetcher;
use crate::traits::ContentSource;
use crate::types::{Post, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
pub const SHORTLINK_BASE: &str = "https://redd.it/";

/// Subreddit "hot" listing over Reddit's public JSON endpoints.
pub struct RedditSource {
    base_url: String,
    fetcher: Fetcher,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    id: String,
    title: String,
    #[serde(default)]
    url: String,
}

impl From<Submission> for Post {
    fn from(submission: Submission) -> Self {
        let shortlink = format!("{SHORTLINK_BASE}{}", submission.id);
        Post {
            id: submission.id,
            title: submission.title,
            url: submission.url,
            shortlink,
        }
    }
}

impl RedditSource {
    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    fn listing_url(&self, category: &str, limit: usize) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/r/{}/hot.json", self.base_url, category),
            &[("limit", limit.to_string()), ("raw_json", "1".to_string())],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl ContentSource for RedditSource {
    fn source_name(&self) -> String {
        format!("Reddit ({})", self.base_url)
    }

    async fn fetch_top(&self, category: &str, limit: usize) -> Result<Vec<Post>> {
        let url = self.listing_url(category, limit)?;
        debug!("Fetching listing {}", url);

        let listing: Listing = self.fetcher.get_json(url.as_str()).await?;
        let posts: Vec<Post> = listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|thing| thing.data.into())
            .collect();

        info!("Fetched {} posts from r/{}", posts.len(), category);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_becomes_post_with_shortlink() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_b2",
                "children": [
                    {"kind": "t3", "data": {"id": "a1", "title": "Cute dog", "url": "https://i.redd.it/a1.png", "permalink": "/r/aww/comments/a1/cute_dog/", "stickied": false}},
                    {"kind": "t3", "data": {"id": "b2", "title": "Cat & box", "url": "https://v.redd.it/b2"}}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let posts: Vec<Post> = listing.data.children.into_iter().map(|t| t.data.into()).collect();

        assert_eq!(posts[0], Post::new("a1", "Cute dog", "https://i.redd.it/a1.png", "https://redd.it/a1"));
        assert_eq!(posts[1].title, "Cat & box");
        assert_eq!(posts[1].shortlink, "https://redd.it/b2");
    }

    #[test]
    fn listing_url_carries_limit() {
        let fetcher = Fetcher::new(Default::default()).unwrap();
        let source = RedditSource::with_base_url(fetcher, "http://localhost:1234/");
        let url = source.listing_url("aww", 5).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/r/aww/hot.json?limit=5&raw_json=1");
    }
}
