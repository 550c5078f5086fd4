use crate::types::{AggregatorError, Result, Source};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("iThome 資安", "https://www.ithome.com.tw/rss/security"),
    ("TWCERT/CC", "https://www.twcert.org.tw/rss"),
    ("The Hacker News", "https://feeds.feedburner.com/TheHackersNews"),
    ("Krebs on Security", "https://krebsonsecurity.com/feed/"),
    ("BleepingComputer", "https://www.bleepingcomputer.com/feed/"),
    ("Dark Reading", "https://www.darkreading.com/rss.xml"),
    ("SecurityWeek", "https://feeds.feedburner.com/securityweek"),
    ("Threatpost", "https://threatpost.com/feed/"),
    ("HackRead", "https://www.hackread.com/feed/"),
    ("Sophos News", "https://news.sophos.com/en-us/feed/"),
];

/// A registry row as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SourceListing {
    pub name: String,
    pub endpoint: String,
    pub is_default: bool,
}

/// Named feed endpoints, kept in insertion order.
///
/// Names are unique; endpoints are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    entries: Vec<Source>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    /// Registry holding [`DEFAULT_SOURCES`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.merge(DEFAULT_SOURCES.iter().map(|(name, endpoint)| (*name, *endpoint)));
        registry
    }

    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Defaults first, then `overrides` on top.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut registry = Self::new();
        registry.merge(overrides);
        registry
    }

    /// Merge a sources file over the current entries.
    ///
    /// A missing file leaves the registry untouched; a malformed one is
    /// logged and otherwise ignored.
    pub fn with_sources_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Sources file {} not found, keeping current sources", path.display());
            return self;
        }
        if let Err(e) = self.load_file(path) {
            warn!("Failed to load sources file {}: {}", path.display(), e);
        }
        self
    }

    /// Insert or overwrite. An overwritten name keeps its position.
    pub fn add(&mut self, name: impl Into<String>, endpoint: impl Into<String>) {
        let name = name.into();
        let endpoint = endpoint.into();

        match self.entries.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                debug!("Updated source {}: {}", name, endpoint);
                existing.endpoint = endpoint;
            }
            None => {
                debug!("Added source {}: {}", name, endpoint);
                self.entries.push(Source { name, endpoint });
            }
        }
    }

    /// `true` if `name` was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.name != name);
        let removed = self.entries.len() != before;
        if removed {
            debug!("Removed source {}", name);
        } else {
            debug!("Source {} not found, nothing removed", name);
        }
        removed
    }

    pub fn merge<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, endpoint) in overrides {
            self.add(name, endpoint);
        }
    }

    pub fn list(&self) -> Vec<SourceListing> {
        self.entries
            .iter()
            .map(|s| SourceListing {
                name: s.name.clone(),
                endpoint: s.endpoint.clone(),
                is_default: Self::is_default(&s.name),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.entries.iter().find(|s| s.name == name)
    }

    pub fn is_default(name: &str) -> bool {
        DEFAULT_SOURCES.iter().any(|(default_name, _)| *default_name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy for a collection cycle.
    pub fn snapshot(&self) -> Vec<Source> {
        self.entries.clone()
    }

    /// Read a JSON object of `name -> endpoint` and merge it in. Returns the
    /// number of entries read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let loaded: Map<String, Value> = serde_json::from_str(&content)?;

        let mut pairs = Vec::with_capacity(loaded.len());
        for (name, endpoint) in loaded {
            match endpoint {
                Value::String(endpoint) => pairs.push((name, endpoint)),
                other => {
                    return Err(AggregatorError::Parse(format!(
                        "endpoint for source {:?} must be a string, got {}",
                        name, other
                    )))
                }
            }
        }

        let count = pairs.len();
        self.merge(pairs);
        info!("Loaded {} sources from {}", count, path.display());
        Ok(count)
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|s| (s.name.clone(), Value::String(s.endpoint.clone())))
            .collect();

        fs::write(path, serde_json::to_string_pretty(&map)?)?;
        info!("Saved {} sources to {}", self.entries.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_defaults_in_order() {
        let registry = SourceRegistry::new();
        let listing = registry.list();
        assert_eq!(listing.len(), DEFAULT_SOURCES.len());
        assert_eq!(listing[0].name, "iThome 資安");
        assert_eq!(listing[9].name, "Sophos News");
        assert!(listing.iter().all(|s| s.is_default));
    }

    #[test]
    fn add_overwrites_in_place() {
        let mut registry = SourceRegistry::new();
        registry.add("TWCERT/CC", "https://mirror.example/rss");
        registry.add("Custom", "https://custom.example/feed");

        let listing = registry.list();
        assert_eq!(listing.len(), DEFAULT_SOURCES.len() + 1);
        assert_eq!(listing[1].endpoint, "https://mirror.example/rss");
        assert_eq!(listing.last().unwrap().name, "Custom");
        assert!(!listing.last().unwrap().is_default);
    }

    #[test]
    fn remove_reports_presence() {
        let mut registry = SourceRegistry::new();
        assert!(registry.remove("Threatpost"));
        assert!(!registry.remove("Threatpost"));
        assert!(registry.get("Threatpost").is_none());
    }

    #[test]
    fn overrides_take_precedence_over_defaults() {
        let registry = SourceRegistry::with_overrides([
            ("Dark Reading", "https://override.example/dr"),
            ("Extra", "https://extra.example/feed"),
        ]);
        assert_eq!(registry.get("Dark Reading").unwrap().endpoint, "https://override.example/dr");
        assert_eq!(registry.len(), DEFAULT_SOURCES.len() + 1);
    }

    #[test]
    fn endpoints_may_repeat_across_names() {
        let mut registry = SourceRegistry::empty();
        registry.add("a", "https://same.example/feed");
        registry.add("b", "https://same.example/feed");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn file_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");

        let mut registry = SourceRegistry::empty();
        registry.add("Zeta", "https://z.example/feed");
        registry.add("Alpha", "https://a.example/feed");
        registry.save_file(&path).unwrap();

        let mut loaded = SourceRegistry::empty();
        assert_eq!(loaded.load_file(&path).unwrap(), 2);
        assert_eq!(loaded, registry);
    }

    #[test]
    fn missing_or_malformed_file_keeps_sources() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SourceRegistry::new().with_sources_file(dir.path().join("absent.json"));
        assert_eq!(registry.len(), DEFAULT_SOURCES.len());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        let registry = SourceRegistry::new().with_sources_file(&bad);
        assert_eq!(registry.len(), DEFAULT_SOURCES.len());

        let mut registry = SourceRegistry::new();
        assert!(registry.load_file(&bad).is_err());
    }

    #[test]
    fn non_string_endpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");
        fs::write(&path, r#"{"Numbers": 42}"#).unwrap();

        let mut registry = SourceRegistry::empty();
        assert!(matches!(registry.load_file(&path), Err(AggregatorError::Parse(_))));
        assert!(registry.is_empty());
    }
}
