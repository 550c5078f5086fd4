use crate::traits::HtmlStripper;
use scraper::Html;

/// [`HtmlStripper`] backed by the `scraper` HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperStripper;

impl HtmlStripper for ScraperStripper {
    fn strip(&self, markup: &str) -> String {
        if markup.is_empty() {
            return String::new();
        }

        let fragment = Html::parse_fragment(markup);
        fragment
            .root_element()
            .text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
