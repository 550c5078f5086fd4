use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

/// Fingerprint of an item's identity: hex SHA-256 of `title + link`.
pub fn fingerprint(title: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(link.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub fingerprint: String,
    pub is_novel: bool,
}

/// Set of fingerprints seen during one collection cycle.
///
/// Shared by reference between callers; for any fingerprint exactly one
/// call to [`Deduplicator::admit`] reports it as novel.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&self, title: &str, link: &str) -> Admission {
        let fingerprint = fingerprint(title, link);
        let is_novel = {
            let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            seen.insert(fingerprint.clone())
        };

        if !is_novel {
            debug!("Skipping duplicate entry: {} ({})", title, link);
        }

        Admission {
            fingerprint,
            is_novel,
        }
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
