//! First-occurrence-wins duplicate removal.
//!
//! The storage provider can enumerate the same entry twice; within one listing
//! folders are unique by normalized display name and files by normalized path.

use super::classify::normalize_folder_key;
use crate::types::Item;
use std::collections::HashSet;

/// Key under which an item is considered a duplicate. Folder and file keys
/// live in separate namespaces.
pub fn dedup_key(item: &Item) -> (bool, String) {
    match item {
        Item::Folder(folder) => (true, normalize_folder_key(&folder.name)),
        Item::File(file) => {
            let path = if file.file_path.is_empty() {
                &file.id
            } else {
                &file.file_path
            };
            (false, path.trim().to_lowercase())
        }
    }
}

/// Keep the first item for every key, preserving relative order.
pub fn dedup(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item)))
        .collect()
}
