use crate::types::{AggregatorError, RawEntry, Result};
use feed_rs::parser;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ENTRY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:item|entry)\b[^>]*>(.*?)</(?:item|entry)\s*>")
        .expect("entry block pattern is a valid regex")
});

static PUBLISHED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:pubDate|published|dc:date)\b[^>]*>(.*?)</(?:pubDate|published|dc:date)\s*>")
        .expect("published tag pattern is a valid regex")
});

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// RSS / Atom / JSON Feed parsing on top of `feed-rs`.
///
/// `feed-rs` drops publication dates it cannot parse, so the raw
/// `pubDate` / `published` text of each XML entry is captured separately
/// and carried in [`RawEntry::published_raw`].
pub struct FeedParser;

impl FeedParser {
    pub fn parse_feed(content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let mut entries: Vec<RawEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        let raw_dates = raw_published_dates(content);
        if raw_dates.len() == entries.len() {
            for (entry, raw) in entries.iter_mut().zip(raw_dates) {
                entry.published_raw = raw;
            }
        } else {
            debug!(
                "Raw date scan found {} entries, parser found {}; skipping raw dates",
                raw_dates.len(),
                entries.len()
            );
        }

        debug!("Parsed feed with {} entries", entries.len());
        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> RawEntry {
        RawEntry {
            title: entry.title.map(|t| t.content),
            link: entry.links.first().map(|l| l.href.clone()),
            // feed-rs folds RSS <description> into the summary
            summary: entry.summary.map(|s| s.content),
            description: None,
            content: entry.content.and_then(|c| c.body).into_iter().collect(),
            published: entry.published,
            updated: entry.updated,
            published_raw: None,
        }
    }
}

/// Publication date text of every `<item>` / `<entry>`, in document order.
fn raw_published_dates(content: &[u8]) -> Vec<Option<String>> {
    let text = String::from_utf8_lossy(content);
    ENTRY_BLOCK
        .captures_iter(&text)
        .map(|block| {
            PUBLISHED_TAG
                .captures(&block[1])
                .map(|tag| unwrap_cdata(tag[1].trim()).to_string())
                .filter(|raw| !raw.is_empty())
        })
        .collect()
}

fn unwrap_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .map(str::trim)
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Security Feed</title>
    <link>https://example.com</link>
    <description>test</description>
    <item>
      <title>Critical flaw CVE-2025-1111 patched</title>
      <link>https://example.com/a</link>
      <description>&lt;p&gt;Vendor ships a &lt;b&gt;fix&lt;/b&gt;.&lt;/p&gt;</description>
      <pubDate>Tue, 10 Jun 2025 08:15:00 GMT</pubDate>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/b</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Example</title>
  <id>urn:example</id>
  <updated>2025-05-01T12:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:example:1</id>
    <link href="https://example.com/atom/1"/>
    <updated>2025-05-01T12:34:56Z</updated>
    <content type="html">&lt;p&gt;Body&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items_in_order() {
        let feed = FeedParser::parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Example Security Feed"));
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.title.as_deref(), Some("Critical flaw CVE-2025-1111 patched"));
        assert_eq!(first.link.as_deref(), Some("https://example.com/a"));
        assert!(first.summary.as_deref().unwrap_or("").contains("fix"));
        assert!(first.published.is_some());

        assert_eq!(feed.entries[1].link.as_deref(), Some("https://example.com/b"));
    }

    #[test]
    fn parses_atom_content_and_updated() {
        let feed = FeedParser::parse_feed(ATOM.as_bytes()).unwrap();
        let entry = &feed.entries[0];
        assert_eq!(entry.link.as_deref(), Some("https://example.com/atom/1"));
        assert!(entry.updated.is_some());
        assert_eq!(entry.content.len(), 1);
    }

    #[test]
    fn keeps_raw_text_of_unparseable_pub_date() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Odd dates</title>
    <link>https://example.com</link>
    <description>test</description>
    <item>
      <title>Odd</title>
      <link>https://example.com/odd</link>
      <pubDate>2025-07-01T10:20 garbage-zone</pubDate>
    </item>
    <item>
      <title>Wrapped</title>
      <link>https://example.com/wrapped</link>
      <pubDate><![CDATA[ sometime in July ]]></pubDate>
    </item>
    <item>
      <title>Undated</title>
      <link>https://example.com/undated</link>
    </item>
  </channel>
</rss>"#;
        let feed = FeedParser::parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 3);

        assert!(feed.entries[0].published.is_none());
        assert_eq!(
            feed.entries[0].published_raw.as_deref(),
            Some("2025-07-01T10:20 garbage-zone")
        );
        assert_eq!(feed.entries[1].published_raw.as_deref(), Some("sometime in July"));
        assert_eq!(feed.entries[2].published_raw, None);
    }

    #[test]
    fn raw_dates_line_up_with_atom_entries() {
        let feed = FeedParser::parse_feed(ATOM.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);
        // Atom entry has <updated> only
        assert_eq!(feed.entries[0].published_raw, None);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let result = FeedParser::parse_feed(b"this is not a feed");
        assert!(matches!(result, Err(AggregatorError::Parse(_))));
    }
}
