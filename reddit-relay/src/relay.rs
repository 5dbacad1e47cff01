use crate::dedup::ForwardedSet;
use crate::fetcher::Fetcher;
use crate::formatter::{format_status, FormatError};
use crate::media::{reencode_jpeg, JPEG_MIME};
use crate::selector::Selector;
use crate::traits::{ContentSource, Publisher};
use crate::types::{
    CycleReport, FailureReason, MediaId, Post, PostFailure, PostKind, PublishOutcome, PublishedPost,
    RelayConfig, Result,
};
use crate::utils::time::format_duration;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Drives fetch -> select -> format -> publish -> persist cycles.
pub struct Relay {
    config: RelayConfig,
    selector: Selector,
    source: Arc<dyn ContentSource>,
    publisher: Arc<dyn Publisher>,
    fetcher: Fetcher,
}

impl Relay {
    pub fn new(
        config: RelayConfig,
        source: Arc<dyn ContentSource>,
        publisher: Arc<dyn Publisher>,
        fetcher: Fetcher,
    ) -> Result<Self> {
        config.validate()?;
        let selector = Selector::new(config.embed_hosts.clone(), config.dedup_max_size, config.dedup_retain);

        info!(
            "Relaying r/{} from {} to {}",
            config.category,
            source.source_name(),
            publisher.publisher_name()
        );

        Ok(Self {
            config,
            selector,
            source,
            publisher,
            fetcher,
        })
    }

    /// Run cycles until an error escapes one of them.
    pub async fn run(&self) -> Result<()> {
        let cycle_delay = Duration::from_secs(self.config.cycle_delay_seconds);
        loop {
            info!("Searching r/{}...", self.config.category);
            match self.run_cycle().await {
                Ok(report) => info!(
                    "Cycle finished: {} fetched, {} selected, {} published, {} failed",
                    report.fetched,
                    report.selected,
                    report.published.len(),
                    report.failures.len()
                ),
                Err(e) => {
                    error!("Cycle failed: {}", e);
                    return Err(e);
                }
            }
            info!("Sleeping {} until next cycle", format_duration(cycle_delay));
            tokio::time::sleep(cycle_delay).await;
        }
    }

    /// One full cycle. The forwarded set is written back only if the cycle
    /// reaches its end; per-post failures are collected, not propagated.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let forwarded = ForwardedSet::load(&self.config.dedup_path)?;
        let candidates = self
            .source
            .fetch_top(&self.config.category, self.config.batch_size)
            .await?;
        let fetched = candidates.len();

        let (eligible, forwarded) = self.selector.select(candidates, forwarded);
        info!("Selected {} of {} posts", eligible.len(), fetched);
        debug!("Forwarded ids: {:?}", forwarded.iter().collect::<Vec<_>>());

        let mut report = CycleReport {
            fetched,
            selected: eligible.len(),
            ..CycleReport::default()
        };

        let post_delay = Duration::from_secs(self.config.post_delay_seconds);
        for (index, post) in eligible.iter().enumerate() {
            match self.forward(post).await {
                Ok(published) => report.published.push(published),
                Err(failure) => {
                    warn!("Problem posting {}: {}", post.id, failure);
                    report.failures.push(failure);
                }
            }
            if index + 1 < eligible.len() {
                tokio::time::sleep(post_delay).await;
            }
        }

        forwarded.save(&self.config.dedup_path)?;
        Ok(report)
    }

    /// Fetch and select without publishing or persisting; returns the text each
    /// eligible post would be published with.
    pub async fn preview(&self) -> Result<Vec<(Post, std::result::Result<String, FormatError>)>> {
        let forwarded = ForwardedSet::load(&self.config.dedup_path)?;
        let candidates = self
            .source
            .fetch_top(&self.config.category, self.config.batch_size)
            .await?;
        let (eligible, _) = self.selector.select(candidates, forwarded);

        Ok(eligible
            .into_iter()
            .map(|post| {
                let embed = self
                    .selector
                    .classify(&post)
                    .map_or(false, PostKind::embeds_preview);
                let text = self.format(&post, embed);
                (post, text)
            })
            .collect())
    }

    fn format(&self, post: &Post, embed_preview: bool) -> std::result::Result<String, FormatError> {
        format_status(
            &post.title,
            &post.shortlink,
            &post.url,
            &self.config.tag,
            embed_preview,
            self.config.max_text_length,
        )
    }

    /// Republish one post.
    pub async fn forward(&self, post: &Post) -> PublishOutcome {
        let kind = self
            .selector
            .classify(post)
            .ok_or_else(|| PostFailure::new(&post.id, FailureReason::Format, "unsupported url"))?;

        let text = self
            .format(post, kind.embeds_preview())
            .map_err(|e| PostFailure::new(&post.id, FailureReason::Format, e))?;

        let media_ids = match kind {
            PostKind::Media => {
                let media_id = self.upload_image(post).await?;
                tokio::time::sleep(Duration::from_secs(self.config.media_delay_seconds)).await;
                vec![media_id]
            }
            PostKind::Embed => Vec::new(),
        };

        let status_id = self
            .publisher
            .post_status(&text, &media_ids)
            .await
            .map_err(|e| PostFailure::new(&post.id, FailureReason::Publish, e))?;

        info!("Forwarded {} as {}", post.id, status_id.0);
        Ok(PublishedPost {
            source_id: post.id.clone(),
            status_id,
            text,
            media_ids,
            published_at: Utc::now(),
        })
    }

    async fn upload_image(&self, post: &Post) -> std::result::Result<MediaId, PostFailure> {
        let bytes = self
            .fetcher
            .get_bytes(&post.url)
            .await
            .map_err(|e| PostFailure::new(&post.id, FailureReason::Download, e))?;

        let jpeg = reencode_jpeg(&bytes, self.config.jpeg_quality)
            .map_err(|e| PostFailure::new(&post.id, FailureReason::Decode, e))?;

        self.publisher
            .upload_media(jpeg, JPEG_MIME)
            .await
            .map_err(|e| PostFailure::new(&post.id, FailureReason::Upload, e))
    }
}
