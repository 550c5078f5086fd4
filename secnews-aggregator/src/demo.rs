//! Canned items shown when a cycle yields nothing (offline demos, blocked networks).

use crate::classifier::Category;
use crate::collection::Collection;
use crate::dedup::fingerprint;
use crate::types::NewsItem;
use tracing::info;

struct DemoItem {
    title: &'static str,
    link: &'static str,
    date: &'static str,
    summary: &'static str,
    source: &'static str,
    category: Category,
    keywords: &'static [&'static str],
}

const DEMO_ITEMS: &[DemoItem] = &[
    DemoItem {
        title: "微軟發布緊急更新修補 WSUS 重大漏洞 CVE-2025-59287",
        link: "https://example.com/news/1",
        date: "2025-11-24 14:30",
        summary: "微軟緊急發布更新修補 Windows Server Update Services (WSUS) 中的重大遠端程式碼執行漏洞。該漏洞允許未經驗證的攻擊者在目標系統上執行任意程式碼。",
        source: "The Hacker News",
        category: Category::Vulnerability,
        keywords: &["CVE-2025-59287", "Microsoft", "WSUS", "vulnerability"],
    },
    DemoItem {
        title: "CrazyHunter 勒索軟體針對台灣金融業發動攻擊",
        link: "https://example.com/news/2",
        date: "2025-11-23 10:15",
        summary: "資安研究人員發現新型勒索軟體 CrazyHunter 正針對台灣金融機構發動攻擊，該惡意程式使用雙重勒索策略，除加密檔案外還威脅公開敏感資料。",
        source: "iThome 資安",
        category: Category::Malware,
        keywords: &["ransomware", "CrazyHunter", "勒索軟體", "金融業"],
    },
    DemoItem {
        title: "研究人員發現 AI 模型可被利用產生惡意程式碼",
        link: "https://example.com/news/3",
        date: "2025-11-22 16:45",
        summary: "資安研究團隊發表報告指出，大型語言模型可能被惡意行為者利用來產生惡意程式碼，呼籲 AI 開發商加強安全防護措施。",
        source: "SecurityWeek",
        category: Category::Other,
        keywords: &["AI", "malware", "研究"],
    },
    DemoItem {
        title: "Oracle 資料庫伺服器發現高風險 SQL 注入漏洞",
        link: "https://example.com/news/4",
        date: "2025-11-21 09:20",
        summary: "Oracle 發布安全公告，針對其資料庫伺服器產品中的 SQL 注入漏洞 CVE-2025-61757 提供修補程式，該漏洞 CVSS 評分高達 9.8。",
        source: "Dark Reading",
        category: Category::Vulnerability,
        keywords: &["CVE-2025-61757", "Oracle", "SQL injection", "vulnerability"],
    },
    DemoItem {
        title: "中國駭客組織 APT24 針對東南亞政府機關發動攻擊",
        link: "https://example.com/news/5",
        date: "2025-11-20 11:30",
        summary: "威脅情報公司揭露中國國家級駭客組織 APT24 近期針對東南亞多國政府機關發動網路間諜活動，竊取敏感外交文件。",
        source: "The Hacker News",
        category: Category::Hacking,
        keywords: &["APT24", "China", "駭客", "政府"],
    },
    DemoItem {
        title: "台灣企業遭供應鏈攻擊，數百家公司受影響",
        link: "https://example.com/news/6",
        date: "2025-11-19 15:00",
        summary: "調查局資安工作站警告，駭客透過入侵本土軟體供應商，植入惡意程式後門，影響使用該軟體的數百家台灣企業。",
        source: "TWCERT/CC",
        category: Category::SupplyChain,
        keywords: &["supply chain", "供應鏈", "台灣", "malware"],
    },
    DemoItem {
        title: "AWS S3 儲存桶配置錯誤導致百萬用戶資料外洩",
        link: "https://example.com/news/7",
        date: "2025-11-18 13:45",
        summary: "某知名 SaaS 平台因 AWS S3 儲存桶配置不當，導致超過 100 萬用戶個資外洩，包括姓名、電子郵件及加密密碼。",
        source: "BleepingComputer",
        category: Category::DataBreach,
        keywords: &["AWS", "S3", "data breach", "雲端安全"],
    },
    DemoItem {
        title: "新型網路釣魚攻擊偽裝成 Microsoft 365 登入頁面",
        link: "https://example.com/news/8",
        date: "2025-11-17 10:00",
        summary: "資安公司發現新型釣魚攻擊活動，駭客建立高度仿真的 Microsoft 365 登入頁面，已有多家企業員工受害。",
        source: "Krebs on Security",
        category: Category::Phishing,
        keywords: &["phishing", "Microsoft 365", "釣魚"],
    },
    DemoItem {
        title: "智慧家電漏洞允許駭客遠端控制設備",
        link: "https://example.com/news/9",
        date: "2025-11-16 14:20",
        summary: "研究人員在多款智慧家電中發現重大安全漏洞，攻擊者可利用這些漏洞遠端控制設備，甚至監聽用戶對話。",
        source: "HackRead",
        category: Category::Iot,
        keywords: &["IoT", "物聯網", "smart home", "vulnerability"],
    },
    DemoItem {
        title: "歐盟通過新網路安全法規強化關鍵基礎設施保護",
        link: "https://example.com/news/10",
        date: "2025-11-15 09:00",
        summary: "歐盟議會通過新版網路安全法規，要求關鍵基礎設施營運商強化資安措施，違者將面臨高額罰款。",
        source: "SecurityWeek",
        category: Category::Policy,
        keywords: &["EU", "法規", "policy", "關鍵基礎設施"],
    },
    DemoItem {
        title: "LockBit 勒索軟體集團宣稱入侵多國醫療機構",
        link: "https://example.com/news/11",
        date: "2025-11-14 16:30",
        summary: "惡名昭彰的 LockBit 勒索軟體集團在暗網公布多家醫療機構資料，要求支付贖金否則將公開病患個資。",
        source: "TWCERT/CC",
        category: Category::Malware,
        keywords: &["LockBit", "ransomware", "勒索軟體", "醫療"],
    },
    DemoItem {
        title: "Grafana 發布重大安全更新修補認證繞過漏洞",
        link: "https://example.com/news/12",
        date: "2025-11-14 08:45",
        summary: "開源監控平台 Grafana 發布緊急安全更新，修補 CVE-2025-41115 認證繞過漏洞，建議用戶立即升級。",
        source: "iThome 資安",
        category: Category::Vulnerability,
        keywords: &["CVE-2025-41115", "Grafana", "vulnerability", "認證繞過"],
    },
];

pub fn demo_items() -> Vec<NewsItem> {
    DEMO_ITEMS
        .iter()
        .map(|demo| NewsItem {
            title: demo.title.to_string(),
            link: demo.link.to_string(),
            date: demo.date.to_string(),
            summary: demo.summary.to_string(),
            source: demo.source.to_string(),
            category: demo.category,
            keywords: demo.keywords.iter().map(|k| k.to_string()).collect(),
            content_hash: fingerprint(demo.title, demo.link),
        })
        .collect()
}

pub fn demo_collection() -> Collection {
    Collection::from_items(demo_items())
}

impl Collection {
    /// `self`, or the demo collection when `self` is empty.
    pub fn or_demo(self) -> Collection {
        if self.is_empty() {
            info!("No items collected, substituting demo data");
            demo_collection()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_items_are_unique_and_sorted() {
        let collection = demo_collection();
        assert_eq!(collection.len(), 12);

        let hashes: HashSet<_> = collection.iter().map(|i| i.content_hash.clone()).collect();
        assert_eq!(hashes.len(), 12);

        let dates: Vec<_> = collection.iter().map(|i| i.date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn or_demo_only_replaces_empty() {
        assert_eq!(Collection::empty().or_demo().len(), 12);

        let one = Collection::from_items(demo_items().into_iter().take(1).collect());
        assert_eq!(one.or_demo().len(), 1);
    }
}
