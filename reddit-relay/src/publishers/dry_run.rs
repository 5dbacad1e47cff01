use crate::traits::Publisher;
use crate::types::{MediaId, Result, StatusId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs what would be published and hands back synthetic ids.
#[derive(Debug, Default)]
pub struct DryRunPublisher {
    counter: AtomicU64,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    fn publisher_name(&self) -> String {
        "dry-run".to_string()
    }

    async fn upload_media(&self, bytes: Vec<u8>, mime: &str) -> Result<MediaId> {
        let id = self.next_id("dry-media");
        info!("[dry-run] would upload {} bytes of {} as {}", bytes.len(), mime, id);
        Ok(MediaId(id))
    }

    async fn post_status(&self, text: &str, media_ids: &[MediaId]) -> Result<StatusId> {
        let id = self.next_id("dry-status");
        info!("[dry-run] would post {:?} with {} media as {}", text, media_ids.len(), id);
        Ok(StatusId(id))
    }
}
