//! Turns one [`RawEntry`] into the canonical `(title, link, date, summary)` form.
//!
//! Entries without a title or link are rejected by returning `None`. Nothing
//! in here ever fails: unparseable dates fall through to the next candidate
//! and finally to the local clock.

use crate::traits::HtmlStripper;
use crate::types::RawEntry;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::sync::Arc;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    pub title: String,
    pub link: String,
    pub date: String,
    pub summary: String,
}

pub struct Normalizer {
    stripper: Arc<dyn HtmlStripper>,
    max_summary_length: usize,
}

impl Normalizer {
    pub fn new(stripper: Arc<dyn HtmlStripper>, max_summary_length: usize) -> Self {
        Self {
            stripper,
            max_summary_length,
        }
    }

    pub fn normalize(&self, entry: &RawEntry) -> Option<NormalizedEntry> {
        self.normalize_at(entry, Local::now().naive_local())
    }

    /// Same as [`Normalizer::normalize`] with an explicit "now" for the date fallback.
    pub fn normalize_at(&self, entry: &RawEntry, now: NaiveDateTime) -> Option<NormalizedEntry> {
        let title = required(entry.title.as_deref())?;
        let link = required(entry.link.as_deref())?;

        let body = body_markup(entry).unwrap_or("");
        let text = collapse_whitespace(&self.stripper.strip(body));
        let summary = truncate_summary(&text, self.max_summary_length);

        Some(NormalizedEntry {
            title,
            link,
            date: resolve_date(entry, now),
            summary,
        })
    }
}

fn required(field: Option<&str>) -> Option<String> {
    let value = field?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Summary, then description, then the first content block.
fn body_markup(entry: &RawEntry) -> Option<&str> {
    entry
        .summary
        .as_deref()
        .or(entry.description.as_deref())
        .or_else(|| entry.content.first().map(String::as_str))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to `max_length` characters, back off to the last space and
/// append [`ELLIPSIS`]. Text that already fits is returned unchanged.
pub fn truncate_summary(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_length).collect();
    let kept = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{}{}", kept, ELLIPSIS)
}

/// Published, then updated, then the raw published string's first 16
/// characters, then `now`.
pub fn resolve_date(entry: &RawEntry, now: NaiveDateTime) -> String {
    let published = entry
        .published
        .or_else(|| entry.published_raw.as_deref().and_then(parse_timestamp));
    if let Some(dt) = published {
        return dt.format(DATE_FORMAT).to_string();
    }

    if let Some(dt) = entry.updated {
        return dt.format(DATE_FORMAT).to_string();
    }

    if let Some(raw) = entry.published_raw.as_deref() {
        let head: String = raw.trim().chars().take(16).collect();
        if !head.is_empty() {
            return head;
        }
    }

    now.format(DATE_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::ScraperStripper;
    use chrono::{NaiveDate, TimeZone};

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(ScraperStripper), 300)
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .and_then(|d| d.and_hms_opt(5, 6, 7))
            .unwrap()
    }

    #[test]
    fn rejects_missing_title_or_link() {
        let n = normalizer();
        let no_title = RawEntry {
            link: Some("https://example.com/a".into()),
            ..Default::default()
        };
        let blank_link = RawEntry::new("Title", "   ");
        assert!(n.normalize(&no_title).is_none());
        assert!(n.normalize(&blank_link).is_none());
    }

    #[test]
    fn trims_title_and_link() {
        let entry = RawEntry::new("  Patch Tuesday \n", " https://example.com/pt ");
        let out = normalizer().normalize_at(&entry, fixed_now()).unwrap();
        assert_eq!(out.title, "Patch Tuesday");
        assert_eq!(out.link, "https://example.com/pt");
    }

    #[test]
    fn body_prefers_summary_then_description_then_content() {
        let n = normalizer();
        let all = RawEntry::new("t", "l")
            .with_summary("<p>from summary</p>")
            .with_description("from description")
            .with_content("from content");
        assert_eq!(n.normalize_at(&all, fixed_now()).unwrap().summary, "from summary");

        let desc = RawEntry::new("t", "l")
            .with_description("from description")
            .with_content("from content");
        assert_eq!(n.normalize_at(&desc, fixed_now()).unwrap().summary, "from description");

        let content = RawEntry::new("t", "l")
            .with_content("<div>first</div>")
            .with_content("second");
        assert_eq!(n.normalize_at(&content, fixed_now()).unwrap().summary, "first");

        let none = RawEntry::new("t", "l");
        assert_eq!(n.normalize_at(&none, fixed_now()).unwrap().summary, "");
    }

    #[test]
    fn collapses_whitespace_after_stripping() {
        let entry = RawEntry::new("t", "l").with_summary("<p>  a\n\n b </p>\t<span>c</span>");
        assert_eq!(normalizer().normalize_at(&entry, fixed_now()).unwrap().summary, "a b c");
    }

    #[test]
    fn truncates_at_last_space_before_limit() {
        let text = format!("{} {}", "a".repeat(295), "b".repeat(14));
        assert_eq!(text.chars().count(), 310);

        let out = truncate_summary(&text, 300);
        assert_eq!(out, format!("{}{}", "a".repeat(295), ELLIPSIS));
        assert!(out.chars().count() <= 300 + ELLIPSIS.len());
    }

    #[test]
    fn truncation_without_space_uses_raw_cut() {
        let out = truncate_summary(&"x".repeat(320), 300);
        assert_eq!(out, format!("{}{}", "x".repeat(300), ELLIPSIS));
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_summary("short text", 300), "short text");
        assert_eq!(truncate_summary(&"y".repeat(300), 300), "y".repeat(300));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "資安 ".repeat(120);
        let out = truncate_summary(text.trim_end(), 300);
        assert!(out.ends_with(ELLIPSIS));
        assert!(out.chars().count() <= 303);
    }

    #[test]
    fn date_uses_published_first() {
        let published = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 59).unwrap();
        let updated = Utc.with_ymd_and_hms(2025, 9, 9, 9, 9, 9).unwrap();
        let entry = RawEntry::new("t", "l")
            .with_published(published)
            .with_updated(updated);
        assert_eq!(resolve_date(&entry, fixed_now()), "2025-01-02 03:04");
    }

    #[test]
    fn date_parses_raw_published_string() {
        let entry = RawEntry::new("t", "l").with_published_raw("Tue, 10 Jun 2025 08:15:00 +0000");
        assert_eq!(resolve_date(&entry, fixed_now()), "2025-06-10 08:15");
    }

    #[test]
    fn date_falls_back_to_updated() {
        let updated = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        let entry = RawEntry::new("t", "l").with_updated(updated);
        assert_eq!(resolve_date(&entry, fixed_now()), "2024-12-31 23:59");
    }

    #[test]
    fn date_falls_back_to_raw_prefix() {
        let entry = RawEntry::new("t", "l").with_published_raw("2025-07-01T10:20 local-ish garbage");
        assert_eq!(resolve_date(&entry, fixed_now()), "2025-07-01T10:20");
    }

    #[test]
    fn date_falls_back_to_now() {
        let entry = RawEntry::new("t", "l").with_published_raw("   ");
        assert_eq!(resolve_date(&entry, fixed_now()), "2025-03-04 05:06");
        assert_eq!(resolve_date(&RawEntry::new("t", "l"), fixed_now()), "2025-03-04 05:06");
    }
}
