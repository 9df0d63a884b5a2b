//! Builder tool: collects links into a persisted working copy
//!
//! The working copy lives in a [`KeyValueStore`] and is saved after every
//! change. New links are enriched one at a time; enrichment problems fall
//! back to the URL host and never reject a link.

use url::Url;

use crate::config::Config;
use crate::document::{
    Bookmark, BookmarkPatch, DedupReport, Document, EmptyCategoryPolicy, MoveTarget,
    ValidationError,
};
use crate::enrich::Enricher;
use crate::format::{self, FormatError};
use crate::storage::{self, KeyValueStore};

/// Input of one add request
#[derive(Debug, Clone, Default)]
pub struct AddLinks {
    /// One URL, or one URL per line in batch mode
    pub text: String,
    /// Target category name; blank selects the default category
    pub category: String,
    /// Title used instead of the fetched one
    pub custom_title: Option<String>,
    pub batch: bool,
}

impl AddLinks {
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            text: url.into(),
            ..Default::default()
        }
    }

    pub fn batch(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            batch: true,
            ..Default::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.custom_title = Some(title.into());
        self
    }

    /// Candidate URLs, trimmed and without blank lines
    fn candidates(&self) -> Vec<&str> {
        let text = self.text.trim();
        if self.batch && text.contains('\n') {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect()
        } else {
            vec![text]
        }
    }
}

/// Outcome of an add request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// `(category, bookmark)` positions of the added entries
    pub added: Vec<(usize, usize)>,
    /// Inputs that were not valid URLs
    pub skipped: Vec<String>,
    /// URLs whose bookmark was rejected
    pub failed: Vec<(String, ValidationError)>,
}

/// Persisted bookmark builder
pub struct LinkBuilder<S: KeyValueStore, E: Enricher> {
    store: S,
    enricher: E,
    key: String,
    document: Document,
}

impl<S: KeyValueStore, E: Enricher> LinkBuilder<S, E> {
    /// Load the working copy from `store`
    pub fn open(store: S, enricher: E, config: &Config) -> Self {
        let key = config.storage.key.clone();
        let document = storage::load_document(&store, &key, EmptyCategoryPolicy::RemoveEmpty)
            .with_default_category(config.default_category.as_str());
        Self {
            store,
            enricher,
            key,
            document,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Enrich and append every valid URL of the request
    pub async fn add_links(&mut self, request: AddLinks) -> Result<BatchReport, ValidationError> {
        if request.text.trim().is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        let mut report = BatchReport::default();
        let mut urls = Vec::new();
        for candidate in request.candidates() {
            match Url::parse(candidate) {
                Ok(url) => urls.push((candidate, url)),
                Err(e) => {
                    tracing::warn!("Skipping invalid URL {candidate}: {e}");
                    report.skipped.push(candidate.to_string());
                }
            }
        }
        if urls.is_empty() {
            return Err(ValidationError::NoValidUrls);
        }

        let custom_title = request
            .custom_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());

        for (raw, url) in urls {
            let info = self.enricher.page_info(&url).await;
            let title = custom_title.unwrap_or(&info.title);
            let mut bookmark = Bookmark::new(title, raw);
            if !info.icon_url.trim().is_empty() {
                bookmark = bookmark.with_icon(info.icon_url);
            }
            match self.document.add_bookmark(&request.category, bookmark) {
                Ok(position) => {
                    tracing::info!("Added bookmark {title}");
                    report.added.push(position);
                }
                Err(e) => {
                    tracing::error!("Failed to add {raw}: {e}");
                    report.failed.push((raw.to_string(), e));
                }
            }
        }

        self.persist();
        Ok(report)
    }

    pub fn edit_bookmark(
        &mut self,
        category: usize,
        index: usize,
        patch: &BookmarkPatch,
    ) -> Result<(), ValidationError> {
        self.document.edit_bookmark(category, index, patch)?;
        self.persist();
        Ok(())
    }

    /// Remove a bookmark; a category left empty is removed with it
    pub fn delete_bookmark(
        &mut self,
        category: usize,
        index: usize,
    ) -> Result<Bookmark, ValidationError> {
        let removed = self.document.delete_bookmark(category, index)?;
        self.persist();
        Ok(removed)
    }

    pub fn move_bookmark(
        &mut self,
        source_category: usize,
        source_index: usize,
        target_category: usize,
        target: MoveTarget,
    ) -> Result<(usize, usize), ValidationError> {
        let position =
            self.document
                .move_bookmark(source_category, source_index, target_category, target)?;
        self.persist();
        Ok(position)
    }

    /// Re-run icon discovery for a bookmark. Returns whether the icon changed.
    pub async fn refresh_icon(
        &mut self,
        category: usize,
        index: usize,
    ) -> Result<bool, ValidationError> {
        let raw = self.document.check_bookmark(category, index)?.url.clone();
        let url = match Url::parse(&raw) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot look up icon for {raw}: {e}");
                return Ok(false);
            }
        };

        let icon = self.enricher.find_icon(&url).await;
        let changed = self.document.set_icon(category, index, Some(icon))?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    pub fn remove_icon(&mut self, category: usize, index: usize) -> Result<bool, ValidationError> {
        let changed = self.document.set_icon(category, index, None)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    pub fn find_duplicates(&self) -> DedupReport {
        self.document.find_duplicates()
    }

    pub fn deduplicate(&mut self) -> DedupReport {
        let report = self.document.deduplicate();
        if !report.is_empty() {
            self.persist();
        }
        report
    }

    pub fn clear(&mut self) {
        self.document.clear();
        self.persist();
    }

    pub fn export_yaml(&self) -> String {
        format::serialize(&self.document)
    }

    /// Replace the working copy with a parsed configuration.
    ///
    /// On error the working copy is left untouched.
    pub fn import_yaml(&mut self, text: &str) -> Result<(), FormatError> {
        let imported = format::deserialize(text)?;
        let default_category = self.document.default_category().to_string();
        let categories = imported
            .into_categories()
            .into_iter()
            .filter(|category| !category.is_empty())
            .collect();
        self.document = Document::from_categories(categories, EmptyCategoryPolicy::RemoveEmpty)
            .with_default_category(default_category);
        self.persist();
        Ok(())
    }

    fn persist(&self) -> bool {
        storage::save_document(&self.store, &self.key, &self.document)
    }
}
