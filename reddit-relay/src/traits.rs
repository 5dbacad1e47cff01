use crate::types::{MediaId, Post, Result, StatusId};
use async_trait::async_trait;

/// Trait for pulling candidate posts from a content source
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch the current top `limit` posts of a category, in listing order
    async fn fetch_top(&self, category: &str, limit: usize) -> Result<Vec<Post>>;
}

/// Trait for republishing to the target platform
#[async_trait]
pub trait Publisher: Send + Sync {
    fn publisher_name(&self) -> String;

    /// Upload a media blob and return the handle to attach to a status
    async fn upload_media(&self, bytes: Vec<u8>, mime: &str) -> Result<MediaId>;

    /// Post a status with zero or more attached media handles
    async fn post_status(&self, text: &str, media_ids: &[MediaId]) -> Result<StatusId>;
}
