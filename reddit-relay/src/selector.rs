use tracing::debug;

use crate::dedup::ForwardedSet;
use crate::types::{Post, PostKind};
use crate::utils::url::{is_embeddable_url, is_image_url};

/// Eligibility rules and the size bound on the forwarded set.
#[derive(Debug, Clone)]
pub struct Selector {
    embed_hosts: Vec<String>,
    max_forwarded: usize,
    retain_forwarded: usize,
}

impl Selector {
    pub fn new(embed_hosts: Vec<String>, max_forwarded: usize, retain_forwarded: usize) -> Self {
        Self {
            embed_hosts,
            max_forwarded,
            retain_forwarded,
        }
    }

    /// How a post would be republished, or `None` if its URL is unsupported.
    pub fn classify(&self, post: &Post) -> Option<PostKind> {
        if is_image_url(&post.url) {
            Some(PostKind::Media)
        } else if is_embeddable_url(&post.url, self.embed_hosts.as_slice()) {
            Some(PostKind::Embed)
        } else {
            None
        }
    }

    /// Keep supported, not-yet-forwarded candidates in input order and record
    /// them as forwarded.
    pub fn select(&self, candidates: Vec<Post>, mut forwarded: ForwardedSet) -> (Vec<Post>, ForwardedSet) {
        let mut eligible = Vec::new();
        for post in candidates {
            if forwarded.contains(&post.id) {
                debug!("Skipping {}: already forwarded", post.id);
                continue;
            }
            if self.classify(&post).is_none() {
                debug!("Skipping {}: unsupported url {}", post.id, post.url);
                continue;
            }
            forwarded.insert(&post.id);
            eligible.push(post);
        }

        let dropped = forwarded.enforce_cap(self.max_forwarded, self.retain_forwarded);
        if dropped > 0 {
            debug!("Trimmed {} old ids from the forwarded set", dropped);
        }
        (eligible, forwarded)
    }
}
