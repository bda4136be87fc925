//! Listing order: folders before files, names in locale order.
//!
//! Locale order here compares accent- and case-insensitively first, then
//! puts unaccented before accented letters, then lowercase before uppercase,
//! then falls back to the raw text so the order is total.

use crate::types::Item;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercased canonical decomposition with combining marks stripped.
fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased canonical decomposition, marks kept.
fn accented_letters(name: &str) -> String {
    name.nfd().flat_map(char::to_lowercase).collect()
}

pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| accented_letters(a).cmp(&accented_letters(b)))
        .then_with(|| b.cmp(a))
}

pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(a.name(), b.name()),
    }
}

/// Stable sort into rendering order.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_items);
}
