//! Listing pipeline
//!
//! Pure functions applied to every listing before it is rendered: file
//! classification, duplicate removal, type/search filtering and ordering.

pub mod classify;
pub mod dedup;
pub mod filter;
pub mod order;

pub use classify::{
    classify_file, extension_badge, infer_file_type, normalize_folder_key, supports_3d_preview,
    FileKind, MODEL_EXTENSIONS,
};
pub use dedup::{dedup, dedup_key};
pub use filter::{apply, filter_by_query, filter_by_type, normalize_query, FilterType};
pub use order::{compare_items, compare_names, sort_items};

use crate::types::{Item, ListingContext};

/// Dedup and sort a freshly fetched listing. The result is what gets cached.
pub fn prepare(items: Vec<Item>) -> Vec<Item> {
    let mut items = dedup(items);
    sort_items(&mut items);
    items
}

/// Project a prepared listing through the active filter and search query.
pub fn project(items: &[Item], filter: FilterType, query: &str, context: &ListingContext) -> Vec<Item> {
    apply(items, filter, query, context)
}
