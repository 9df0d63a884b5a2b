//! Duplicate detection within categories
//!
//! Duplicates are bookmarks whose `url` matches an earlier bookmark of the
//! same category, compared as exact strings. The first occurrence is kept.

use std::collections::{HashMap, HashSet};

use super::Category;

/// A bookmark that deduplication discards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    /// Name of the category holding both bookmarks
    pub category: String,
    /// Position of that category in the document
    pub category_index: usize,
    /// Name of the discarded bookmark
    pub name: String,
    /// Shared URL
    pub url: String,
    /// Position of the first occurrence, which is kept
    pub kept_index: usize,
    /// Position of the discarded occurrence, before any removal
    pub removed_index: usize,
}

/// Result of scanning a document for duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub duplicates: Vec<DuplicateEntry>,
}

impl DedupReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    /// Number of categories that contain at least one duplicate
    pub fn affected_categories(&self) -> usize {
        self.duplicates
            .iter()
            .map(|d| d.category_index)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Scan categories in order and list every later occurrence of a URL.
pub(crate) fn scan(categories: &[Category]) -> DedupReport {
    let mut duplicates = Vec::new();

    for (category_index, category) in categories.iter().enumerate() {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, bookmark) in category.entries.iter().enumerate() {
            match seen.get(bookmark.url.as_str()) {
                Some(&kept_index) => duplicates.push(DuplicateEntry {
                    category: category.name.clone(),
                    category_index,
                    name: bookmark.name.clone(),
                    url: bookmark.url.clone(),
                    kept_index,
                    removed_index: index,
                }),
                None => {
                    seen.insert(bookmark.url.as_str(), index);
                }
            }
        }
    }

    DedupReport { duplicates }
}

/// Drop every later occurrence of a URL, category by category.
///
/// Emptied categories stay in place.
pub(crate) fn remove_duplicates(categories: &mut [Category]) {
    for category in categories.iter_mut() {
        let mut seen = HashSet::new();
        category
            .entries
            .retain(|bookmark| seen.insert(bookmark.url.clone()));
    }
}
