//! Bookkeeping of already-forwarded post ids.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use tracing::debug;

use crate::types::Result;

/// Ordered set of forwarded ids, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ForwardedSet {
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl ForwardedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an id has been forwarded.
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Append an id as the most recent entry. Returns false if it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.members.insert(id.to_string()) {
            return false;
        }
        self.order.push_back(id.to_string());
        true
    }

    /// Once the set holds more than `max_size` ids, keep only the `retain` most recent.
    ///
    /// Returns the number of ids dropped.
    pub fn enforce_cap(&mut self, max_size: usize, retain: usize) -> usize {
        if self.order.len() <= max_size {
            return 0;
        }
        let keep = retain.min(max_size);
        let dropped = self.order.len() - keep;
        for id in self.order.drain(..dropped) {
            self.members.remove(&id);
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Load from a line-delimited file. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No dedup file at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let set: Self = content.lines().collect();
        debug!("Loaded {} forwarded ids from {}", set.len(), path.display());
        Ok(set)
    }

    /// Overwrite the file with one id per line.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut content = String::new();
        for id in &self.order {
            content.push_str(id);
            content.push('\n');
        }
        std::fs::write(path, content)?;
        debug!("Saved {} forwarded ids to {}", self.len(), path.display());
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for ForwardedSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            let id = id.trim();
            if !id.is_empty() {
                set.insert(id);
            }
        }
        set
    }
}
