//! Rule-based topic labelling and keyword extraction.
//!
//! Both tables are ordered. The category table is a priority list: the first
//! category with a matching keyword wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Malware")]
    Malware,
    #[serde(rename = "Vulnerability")]
    Vulnerability,
    #[serde(rename = "Data Breach")]
    DataBreach,
    #[serde(rename = "Hacking")]
    Hacking,
    #[serde(rename = "Phishing")]
    Phishing,
    #[serde(rename = "Supply Chain")]
    SupplyChain,
    #[serde(rename = "Cloud Security")]
    CloudSecurity,
    #[serde(rename = "IoT")]
    Iot,
    #[serde(rename = "Policy")]
    Policy,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Malware => "Malware",
            Category::Vulnerability => "Vulnerability",
            Category::DataBreach => "Data Breach",
            Category::Hacking => "Hacking",
            Category::Phishing => "Phishing",
            Category::SupplyChain => "Supply Chain",
            Category::CloudSecurity => "Cloud Security",
            Category::Iot => "IoT",
            Category::Policy => "Policy",
            Category::Other => "Other",
        }
    }
}

impl Category {
    /// Traditional Chinese label used by the Taiwanese sources.
    pub fn local_label(&self) -> &'static str {
        match self {
            Category::Malware => "惡意程式",
            Category::Vulnerability => "漏洞",
            Category::DataBreach => "資料外洩",
            Category::Hacking => "駭客攻擊",
            Category::Phishing => "網路釣魚",
            Category::SupplyChain => "供應鏈",
            Category::CloudSecurity => "雲端安全",
            Category::Iot => "物聯網",
            Category::Policy => "政策法規",
            Category::Other => "其他",
        }
    }

    /// Case-insensitive substring match against either label.
    pub fn matches_label(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.label().to_lowercase().contains(&needle) || self.local_label().contains(&needle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Malware,
        &[
            "malware", "ransomware", "trojan", "virus", "worm", "botnet",
            "惡意程式", "勒索軟體", "木馬", "病毒", "蠕蟲", "殭屍網路",
        ],
    ),
    (
        Category::Vulnerability,
        &[
            "vulnerability", "cve", "exploit", "zero-day", "0day", "patch",
            "漏洞", "弱點", "修補", "零日",
        ],
    ),
    (
        Category::DataBreach,
        &["breach", "leak", "exposed", "stolen", "dump", "外洩", "洩漏", "竊取", "曝光"],
    ),
    (
        Category::Hacking,
        &["hack", "attack", "intrusion", "compromise", "apt", "駭客", "攻擊", "入侵", "滲透"],
    ),
    (
        Category::Phishing,
        &["phishing", "scam", "fraud", "social engineering", "釣魚", "詐騙", "社交工程"],
    ),
    (
        Category::SupplyChain,
        &["supply chain", "software supply", "dependency", "供應鏈", "軟體供應"],
    ),
    (
        Category::CloudSecurity,
        &["cloud", "aws", "azure", "gcp", "kubernetes", "container", "雲端", "容器"],
    ),
    (
        Category::Iot,
        &["iot", "smart device", "embedded", "firmware", "物聯網", "智慧裝置", "韌體"],
    ),
    (
        Category::Policy,
        &["regulation", "compliance", "gdpr", "policy", "law", "法規", "合規", "政策", "法律"],
    ),
];

/// Terms reported as keywords, in this order, using this casing.
pub const IMPORTANT_TERMS: &[&str] = &[
    "CVE", "APT", "zero-day", "ransomware", "malware", "phishing",
    "vulnerability", "exploit", "breach", "attack", "hack",
    "Microsoft", "Google", "Apple", "Linux", "Windows", "Android", "iOS",
    "FBI", "NSA", "CISA", "Mandiant", "CrowdStrike",
    "漏洞", "駭客", "攻擊", "勒索", "惡意程式", "資安",
];

static CVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)CVE-\d{4}-\d+").expect("CVE pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub keywords: Vec<String>,
}

pub fn classify(title: &str, summary: &str) -> Classification {
    Classification {
        category: categorize(title, summary),
        keywords: extract_keywords(title, summary),
    }
}

pub fn categorize(title: &str, summary: &str) -> Category {
    let content = combined(title, summary).to_lowercase();

    CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| content.contains(&kw.to_lowercase())))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// CVE identifiers first (uppercased, first occurrence order), then the
/// [`IMPORTANT_TERMS`] found in the text, capped at [`MAX_KEYWORDS`].
pub fn extract_keywords(title: &str, summary: &str) -> Vec<String> {
    let content = combined(title, summary);
    let lowered = content.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for cve in CVE_PATTERN.find_iter(&content) {
        let id = cve.as_str().to_uppercase();
        if !keywords.contains(&id) {
            keywords.push(id);
        }
    }

    for term in IMPORTANT_TERMS {
        if lowered.contains(&term.to_lowercase()) && !keywords.iter().any(|k| k == term) {
            keywords.push((*term).to_string());
        }
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords
}

fn combined(title: &str, summary: &str) -> String {
    format!("{} {}", title, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_in_either_language() {
        assert!(Category::Vulnerability.matches_label("漏洞"));
        assert!(Category::Vulnerability.matches_label("VULN"));
        assert!(Category::CloudSecurity.matches_label("雲端"));
        assert!(Category::Other.matches_label("其他"));
        assert!(!Category::Malware.matches_label("漏洞"));
    }

    #[test]
    fn first_matching_category_wins() {
        // "ransomware" (Malware) and "vulnerability" (Vulnerability) both match
        let category = categorize("New vulnerability abused by ransomware crew", "");
        assert_eq!(category, Category::Malware);

        let category = categorize("Phishing kit leaks credentials", "");
        assert_eq!(category, Category::DataBreach);
    }

    #[test]
    fn matching_is_case_insensitive_and_covers_summary() {
        assert_eq!(categorize("Quarterly update", "GDPR fines rise"), Category::Policy);
        assert_eq!(categorize("KUBERNETES misconfig", ""), Category::CloudSecurity);
    }

    #[test]
    fn chinese_keywords_match() {
        assert_eq!(categorize("台灣企業遭供應鏈攻擊", ""), Category::Hacking);
        assert_eq!(categorize("新型網路釣魚活動", ""), Category::Phishing);
    }

    #[test]
    fn unmatched_text_is_other() {
        assert_eq!(categorize("Quarterly earnings", "Revenue grew"), Category::Other);
    }

    #[test]
    fn cve_is_first_and_uppercased() {
        let keywords = extract_keywords("Fix for cve-2024-1234 released", "Microsoft patch");
        assert_eq!(keywords[0], "CVE-2024-1234");
        assert!(keywords.contains(&"CVE".to_string()));
        assert!(keywords.contains(&"Microsoft".to_string()));
    }

    #[test]
    fn duplicate_cves_are_reported_once() {
        let keywords = extract_keywords("CVE-2025-0001 and cve-2025-0001", "also CVE-2025-0002");
        assert_eq!(&keywords[..2], &["CVE-2025-0001".to_string(), "CVE-2025-0002".to_string()]);
        assert_eq!(keywords.iter().filter(|k| *k == "CVE-2025-0001").count(), 1);
    }

    #[test]
    fn terms_follow_table_order_and_canonical_case() {
        let keywords = extract_keywords("windows malware", "seen by crowdstrike and the fbi");
        assert_eq!(keywords, vec!["malware", "Windows", "FBI", "CrowdStrike"]);
    }

    #[test]
    fn keywords_are_capped() {
        let title = "CVE-2025-0001 CVE-2025-0002 CVE-2025-0003 CVE-2025-0004 CVE-2025-0005";
        let summary = "CVE-2025-0006 CVE-2025-0007 CVE-2025-0008 CVE-2025-0009 malware phishing";
        let keywords = extract_keywords(title, summary);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[9], "CVE");
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&Category::DataBreach).unwrap();
        assert_eq!(json, "\"Data Breach\"");
        assert_eq!(Category::Iot.to_string(), "IoT");
    }
}
