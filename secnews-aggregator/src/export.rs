use crate::collection::Collection;
use crate::types::{NewsItem, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ExportedItem<'a> {
    #[serde(flatten)]
    pub item: &'a NewsItem,
    pub keywords_str: String,
}

/// JSON document written by [`write_json`].
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub generated_at: String,
    pub total_count: usize,
    pub sources: Vec<&'a str>,
    pub categories: Vec<&'a str>,
    pub news: Vec<ExportedItem<'a>>,
}

impl<'a> ExportDocument<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            total_count: collection.len(),
            sources: collection.sources(),
            categories: collection.categories(),
            news: collection
                .iter()
                .map(|item| ExportedItem {
                    item,
                    keywords_str: item.keywords_str(),
                })
                .collect(),
        }
    }
}

pub fn to_json_string(collection: &Collection) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportDocument::new(collection))?)
}

pub fn write_json(collection: &Collection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json_string(collection)?)?;
    info!("Exported {} items to {}", collection.len(), path.display());
    Ok(())
}
