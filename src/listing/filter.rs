//! Type filter and search query composition.

use super::classify::{classify_file, FileKind};
use crate::types::{Item, ListingContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sidebar type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    All,
    Folders,
    Images,
    Pdfs,
    Models,
}

impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::All,
        FilterType::Folders,
        FilterType::Images,
        FilterType::Pdfs,
        FilterType::Models,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Folders => "folders",
            FilterType::Images => "images",
            FilterType::Pdfs => "pdfs",
            FilterType::Models => "models",
        }
    }

    pub fn matches(self, item: &Item) -> bool {
        let wanted = match self {
            FilterType::All => return true,
            FilterType::Folders => return item.is_folder(),
            FilterType::Images => FileKind::Image,
            FilterType::Pdfs => FileKind::Pdf,
            FilterType::Models => FileKind::Model,
        };
        item.as_file()
            .map(|file| classify_file(file) == wanted)
            .unwrap_or(false)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid filter: {} (must be one of all, folders, images, pdfs, models)",
                    s
                )
            })
    }
}

/// Search text as matched: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn matches_query(item: &Item, needle: &str, context: &ListingContext) -> bool {
    // At root the query targets folder names, inside a folder it targets file names.
    let targeted = if context.is_root() {
        item.is_folder()
    } else {
        !item.is_folder()
    };
    targeted && item.name().to_lowercase().contains(needle)
}

pub fn filter_by_type(items: &[Item], filter: FilterType) -> Vec<Item> {
    items.iter().filter(|i| filter.matches(i)).cloned().collect()
}

/// Keep items matching `query`. An empty query keeps everything.
pub fn filter_by_query(items: &[Item], query: &str, context: &ListingContext) -> Vec<Item> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| matches_query(i, &needle, context))
        .cloned()
        .collect()
}

/// Conjunction of the type filter and the search query, in one pass.
pub fn apply(items: &[Item], filter: FilterType, query: &str, context: &ListingContext) -> Vec<Item> {
    let needle = normalize_query(query);
    items
        .iter()
        .filter(|i| filter.matches(i))
        .filter(|i| needle.is_empty() || matches_query(i, &needle, context))
        .cloned()
        .collect()
}
