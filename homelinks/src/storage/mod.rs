//! Local key-value persistence for the builder working copy
//!
//! The working copy is stored under one key as a JSON array of
//! `[categoryName, [record, ...]]` pairs, the layout the browser tool kept
//! in local storage. Stores written by that tool load unchanged; fields it
//! wrote that the document does not model (`id`, `category`) are ignored.
//!
//! Persistence never interrupts editing: a missing or corrupt entry loads
//! as an empty document and failed writes are only logged.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::document::{
    Bookmark, Category, Document, EmptyCategoryPolicy, default_description,
    generate_abbreviation,
};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete `key` if present
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store using DashMap
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One bookmark as the browser tool stored it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBookmark {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub description: String,
}

impl From<&Bookmark> for StoredBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            url: bookmark.url.clone(),
            title: bookmark.name.clone(),
            favicon: bookmark.icon.clone(),
            abbr: bookmark.abbr.clone(),
            description: bookmark.description.clone(),
        }
    }
}

impl StoredBookmark {
    fn into_bookmark(self) -> Bookmark {
        let abbr = match self.abbr.trim() {
            "" => generate_abbreviation(&self.url),
            _ => self.abbr,
        };
        let description = match self.description.trim() {
            "" => default_description(&self.url),
            _ => self.description,
        };
        Bookmark {
            name: self.title,
            abbr,
            url: self.url,
            description,
            icon: self.favicon.filter(|icon| !icon.trim().is_empty()),
        }
    }
}

type StoredDocument = Vec<(String, Vec<StoredBookmark>)>;

/// Encode a document as a JSON array of pairs
pub fn encode_document(document: &Document) -> anyhow::Result<String> {
    let pairs: StoredDocument = document
        .categories()
        .iter()
        .map(|category| {
            let records = category.entries.iter().map(StoredBookmark::from).collect();
            (category.name.clone(), records)
        })
        .collect();
    Ok(serde_json::to_string(&pairs)?)
}

/// Decode a JSON array of pairs. Records missing a title or URL are skipped.
pub fn decode_document(text: &str, policy: EmptyCategoryPolicy) -> anyhow::Result<Document> {
    let pairs: StoredDocument = serde_json::from_str(text)?;
    let categories = pairs
        .into_iter()
        .map(|(name, records)| {
            let entries = records
                .into_iter()
                .map(StoredBookmark::into_bookmark)
                .filter(|bookmark| match bookmark.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Skipping stored bookmark in {name}: {e}");
                        false
                    }
                })
                .collect();
            Category::with_entries(name, entries)
        })
        .filter(|category| {
            let keep = policy == EmptyCategoryPolicy::KeepEmpty || !category.is_empty();
            if !keep {
                tracing::warn!(
                    "Dropping stored category {} with no usable bookmarks",
                    category.name
                );
            }
            keep
        })
        .collect();
    Ok(Document::from_categories(categories, policy))
}

/// Load the document under `key`, or an empty one when absent or unreadable
pub fn load_document(
    store: &impl KeyValueStore,
    key: &str,
    policy: EmptyCategoryPolicy,
) -> Document {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return Document::new(policy),
        Err(e) => {
            tracing::warn!("Failed to read stored bookmarks: {e}");
            return Document::new(policy);
        }
    };

    match decode_document(&text, policy) {
        Ok(document) => {
            tracing::info!(
                "Loaded {} bookmarks from local storage",
                document.total_bookmarks()
            );
            document
        }
        Err(e) => {
            tracing::warn!("Stored bookmarks are corrupt, starting empty: {e}");
            Document::new(policy)
        }
    }
}

/// Save the document under `key`. Failures are logged and reported as `false`.
pub fn save_document(store: &impl KeyValueStore, key: &str, document: &Document) -> bool {
    let result = encode_document(document).and_then(|text| store.set(key, &text));
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to save bookmarks to local storage: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "homepageBookmarks";

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("storage unavailable")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("quota exceeded")
        }

        fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn document() -> Document {
        let mut document = Document::new(EmptyCategoryPolicy::RemoveEmpty);
        document
            .add_bookmark(
                "Dev",
                Bookmark::new("GitHub", "https://github.com")
                    .with_icon("https://www.google.com/s2/favicons?domain=github.com&sz=64"),
            )
            .unwrap();
        document
            .add_bookmark("未整理", Bookmark::new("Docs", "https://docs.rs"))
            .unwrap();
        document
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let original = document();
        assert!(save_document(&store, KEY, &original));

        let loaded = load_document(&store, KEY, EmptyCategoryPolicy::RemoveEmpty);
        assert_eq!(loaded, original);
        assert_eq!(loaded.policy(), EmptyCategoryPolicy::RemoveEmpty);
    }

    #[test]
    fn test_encoding_is_array_of_pairs() {
        let text = encode_document(&document()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let pairs = value.as_array().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0][0], "Dev");
        assert_eq!(pairs[0][1][0]["title"], "GitHub");
        assert_eq!(pairs[0][1][0]["url"], "https://github.com");
        assert_eq!(pairs[1][1][0]["favicon"], serde_json::Value::Null);
    }

    #[test]
    fn test_decode_browser_layout() {
        let text = r#"[["Tools",[{"url":"https://www.rust-lang.org","title":"Rust","category":"Tools",
            "favicon":null,"abbr":"RU","id":1718000000000.42,"description":""}]]]"#;
        let document = decode_document(text, EmptyCategoryPolicy::RemoveEmpty).unwrap();
        let rust = document.bookmark(0, 0).unwrap();
        assert_eq!(rust.name, "Rust");
        assert_eq!(rust.description, "www.rust-lang.org");
        assert_eq!(rust.icon, None);
    }

    #[test]
    fn test_decode_skips_invalid_records() {
        let text = r#"[["Tools",[{"url":"","title":"Nothing"},{"url":"https://a.io","title":"A"}]]]"#;
        let document = decode_document(text, EmptyCategoryPolicy::RemoveEmpty).unwrap();
        assert_eq!(document.total_bookmarks(), 1);
        assert_eq!(document.bookmark(0, 0).unwrap().abbr, "A");
    }

    #[test]
    fn test_decode_drops_categories_left_empty() {
        let text = r#"[["Broken",[{"url":"","title":"Nothing"}]],["Tools",[{"url":"https://a.io","title":"A"}]]]"#;

        let document = decode_document(text, EmptyCategoryPolicy::RemoveEmpty).unwrap();
        assert_eq!(document.categories().len(), 1);
        assert_eq!(document.categories()[0].name, "Tools");

        let document = decode_document(text, EmptyCategoryPolicy::KeepEmpty).unwrap();
        assert_eq!(document.categories().len(), 2);
        assert!(document.categories()[0].is_empty());
    }

    #[test]
    fn test_missing_entry_loads_empty() {
        let store = MemoryStore::new();
        let document = load_document(&store, KEY, EmptyCategoryPolicy::RemoveEmpty);
        assert!(document.is_empty());
    }

    #[test]
    fn test_corrupt_entry_loads_empty() {
        let store = MemoryStore::new();
        store.set(KEY, "{not json").unwrap();
        let document = load_document(&store, KEY, EmptyCategoryPolicy::RemoveEmpty);
        assert!(document.is_empty());

        store.set(KEY, r#"{"Dev": []}"#).unwrap();
        assert!(load_document(&store, KEY, EmptyCategoryPolicy::RemoveEmpty).is_empty());
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let document = load_document(&ReadOnlyStore, KEY, EmptyCategoryPolicy::RemoveEmpty);
        assert!(document.is_empty());
        assert!(!save_document(&ReadOnlyStore, KEY, &self::document()));
    }

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_arc_store_shares_entries() {
        let store = Arc::new(MemoryStore::new());
        let shared = Arc::clone(&store);
        assert!(save_document(&shared, KEY, &document()));
        assert_eq!(
            load_document(&store, KEY, EmptyCategoryPolicy::RemoveEmpty).total_bookmarks(),
            2
        );
    }
}
