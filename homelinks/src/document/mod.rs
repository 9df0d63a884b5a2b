//! Bookmark document model
//!
//! A document is an ordered sequence of categories, each holding an ordered
//! sequence of bookmarks. Order is user controlled and significant: it is
//! what the exported configuration shows.
//!
//! Every mutating operation validates its inputs before touching the tree,
//! so a failed call leaves the document exactly as it was.

use thiserror::Error;

pub mod dedup;
pub mod derive;

pub use dedup::{DedupReport, DuplicateEntry};
pub use derive::{default_description, generate_abbreviation, normalize_abbreviation};

/// Label used when a bookmark is filed without a category
pub const DEFAULT_CATEGORY: &str = "未整理";

/// Errors for operations rejected before any mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bookmark name must not be empty")]
    EmptyName,
    #[error("bookmark url must not be empty")]
    EmptyUrl,
    #[error("abbreviation {0:?} contains no letters")]
    InvalidAbbreviation(String),
    #[error("no valid url found in input")]
    NoValidUrls,
    #[error("category index {index} is out of range ({len} categories)")]
    CategoryOutOfRange { index: usize, len: usize },
    #[error("bookmark index {index} is out of range in category {category} ({len} bookmarks)")]
    BookmarkOutOfRange {
        category: usize,
        index: usize,
        len: usize,
    },
    #[error("target position {index} is out of range in category {category} ({len} bookmarks)")]
    TargetOutOfRange {
        category: usize,
        index: usize,
        len: usize,
    },
}

/// A single named link record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Display title
    pub name: String,
    /// Up to two uppercase letters shown when there is no icon
    pub abbr: String,
    /// Absolute address
    pub url: String,
    /// Free text, the URL host by default
    pub description: String,
    /// Address of an icon resource, if one is stored
    pub icon: Option<String>,
}

impl Bookmark {
    /// Create a bookmark with derived abbreviation and description
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            abbr: generate_abbreviation(&url),
            description: default_description(&url),
            url,
            icon: None,
        }
    }

    /// Set the icon; a blank value leaves the bookmark without one
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        let icon = icon.into();
        self.icon = (!icon.trim().is_empty()).then_some(icon);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the required fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        Ok(())
    }
}

/// Named, ordered group of bookmarks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<Bookmark>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(name: impl Into<String>, entries: Vec<Bookmark>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Form input for a new bookmark. Blank fields mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub name: String,
    pub abbr: String,
    pub url: String,
    pub description: String,
    pub icon: String,
}

impl BookmarkDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Validate the form and fill in derived fields
    pub fn into_bookmark(self) -> Result<Bookmark, ValidationError> {
        let name = required(&self.name).ok_or(ValidationError::EmptyName)?;
        let url = required(&self.url).ok_or(ValidationError::EmptyUrl)?;
        let abbr = resolve_abbr(&self.abbr, &url)?;
        let description = match required(&self.description) {
            Some(description) => description,
            None => default_description(&url),
        };

        Ok(Bookmark {
            name,
            abbr,
            url,
            description,
            icon: required(&self.icon),
        })
    }
}

/// Partial update for an existing bookmark.
///
/// `None` keeps the current value. A blank `abbr` or `description`
/// re-derives it from the URL, a blank `icon` removes the icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub name: Option<String>,
    pub abbr: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Compute the updated bookmark without modifying `base`
    pub fn apply(&self, base: &Bookmark) -> Result<Bookmark, ValidationError> {
        let name = match &self.name {
            Some(name) => required(name).ok_or(ValidationError::EmptyName)?,
            None => base.name.clone(),
        };
        let url = match &self.url {
            Some(url) => required(url).ok_or(ValidationError::EmptyUrl)?,
            None => base.url.clone(),
        };
        let abbr = match &self.abbr {
            Some(abbr) => resolve_abbr(abbr, &url)?,
            None if base.abbr.trim().is_empty() => generate_abbreviation(&url),
            None => base.abbr.clone(),
        };
        let description = match self.description.as_deref().map(str::trim) {
            Some("") => default_description(&url),
            Some(description) => description.to_string(),
            None if base.description.trim().is_empty() => default_description(&url),
            None => base.description.clone(),
        };
        let icon = match &self.icon {
            Some(icon) => required(icon),
            None => base.icon.clone(),
        };

        Ok(Bookmark {
            name,
            abbr,
            url,
            description,
            icon,
        })
    }
}

impl From<BookmarkDraft> for BookmarkPatch {
    fn from(draft: BookmarkDraft) -> Self {
        Self {
            name: Some(draft.name),
            abbr: Some(draft.abbr),
            url: Some(draft.url),
            description: Some(draft.description),
            icon: Some(draft.icon),
        }
    }
}

/// Where a moved bookmark lands in its target category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Dropped onto the card at this index: the bookmark takes that position
    Onto(usize),
    /// Inserted into the gap before this index, counted before removal
    Before(usize),
    /// Appended after the last bookmark
    End,
}

/// What deleting the last bookmark of a category does to the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCategoryPolicy {
    /// Drop the category together with its last bookmark
    RemoveEmpty,
    /// Leave the empty category in place
    KeepEmpty,
}

/// Ordered, hierarchical bookmark document
#[derive(Debug, Clone)]
pub struct Document {
    categories: Vec<Category>,
    policy: EmptyCategoryPolicy,
    default_category: String,
}

/// Documents compare by content only
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories
    }
}

impl Eq for Document {}

impl Document {
    pub fn new(policy: EmptyCategoryPolicy) -> Self {
        Self::from_categories(Vec::new(), policy)
    }

    pub fn from_categories(categories: Vec<Category>, policy: EmptyCategoryPolicy) -> Self {
        Self {
            categories,
            policy,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Replace the label used for blank category names
    pub fn with_default_category(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.default_category = label.trim().to_string();
        }
        self
    }

    pub fn with_policy(mut self, policy: EmptyCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Label used when a bookmark is added under a blank category name
    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn policy(&self) -> EmptyCategoryPolicy {
        self.policy
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn bookmark(&self, category: usize, index: usize) -> Option<&Bookmark> {
        self.categories.get(category)?.entries.get(index)
    }

    /// Index of the first category with this exact (trimmed) name
    pub fn find_category(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_bookmarks(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    /// Append an empty category unless one with that name exists.
    ///
    /// Returns the index of the new or existing category.
    pub fn add_category(&mut self, name: &str) -> usize {
        let name = self.category_label(name);
        if let Some(index) = self.find_category(&name) {
            return index;
        }
        self.categories.push(Category::new(name));
        self.categories.len() - 1
    }

    /// Append a bookmark to the named category, creating it when absent.
    ///
    /// Returns the `(category, bookmark)` position of the new entry.
    pub fn add_bookmark(
        &mut self,
        category: &str,
        bookmark: Bookmark,
    ) -> Result<(usize, usize), ValidationError> {
        bookmark.validate()?;
        let category = self.add_category(category);
        let entries = &mut self.categories[category].entries;
        entries.push(bookmark);
        Ok((category, entries.len() - 1))
    }

    /// Append a bookmark to the category at `category`
    pub fn add_bookmark_at(
        &mut self,
        category: usize,
        bookmark: Bookmark,
    ) -> Result<usize, ValidationError> {
        self.check_category(category)?;
        bookmark.validate()?;
        let entries = &mut self.categories[category].entries;
        entries.push(bookmark);
        Ok(entries.len() - 1)
    }

    /// Replace the bookmark at a position, keeping the position
    pub fn edit_bookmark(
        &mut self,
        category: usize,
        index: usize,
        patch: &BookmarkPatch,
    ) -> Result<(), ValidationError> {
        self.check_bookmark(category, index)?;
        let updated = patch.apply(&self.categories[category].entries[index])?;
        self.categories[category].entries[index] = updated;
        Ok(())
    }

    /// Set or clear the icon of a bookmark. Returns whether it changed.
    pub fn set_icon(
        &mut self,
        category: usize,
        index: usize,
        icon: Option<String>,
    ) -> Result<bool, ValidationError> {
        self.check_bookmark(category, index)?;
        let icon = icon.as_deref().and_then(required);
        let bookmark = &mut self.categories[category].entries[index];
        if bookmark.icon == icon {
            return Ok(false);
        }
        bookmark.icon = icon;
        Ok(true)
    }

    /// Remove a bookmark and return it.
    ///
    /// With [`EmptyCategoryPolicy::RemoveEmpty`] an emptied category is removed too.
    pub fn delete_bookmark(
        &mut self,
        category: usize,
        index: usize,
    ) -> Result<Bookmark, ValidationError> {
        self.check_bookmark(category, index)?;
        let removed = self.categories[category].entries.remove(index);
        if self.policy == EmptyCategoryPolicy::RemoveEmpty && self.categories[category].is_empty()
        {
            let dropped = self.categories.remove(category);
            tracing::debug!("Removed empty category {}", dropped.name);
        }
        Ok(removed)
    }

    /// Move a bookmark to another position, possibly in another category.
    ///
    /// Returns the final `(category, bookmark)` position. Categories emptied
    /// by a move are kept.
    pub fn move_bookmark(
        &mut self,
        source_category: usize,
        source_index: usize,
        target_category: usize,
        target: MoveTarget,
    ) -> Result<(usize, usize), ValidationError> {
        self.check_bookmark(source_category, source_index)?;
        let target_len = self.check_category(target_category)?.len();
        let same_category = source_category == target_category;
        // length of the target sequence once the bookmark is taken out
        let remaining = if same_category {
            target_len - 1
        } else {
            target_len
        };

        let insert_at = match target {
            MoveTarget::End => remaining,
            MoveTarget::Onto(index) if index <= remaining => index,
            MoveTarget::Before(index) if index <= target_len => {
                if same_category && source_index < index {
                    index - 1
                } else {
                    index
                }
            }
            MoveTarget::Onto(index) | MoveTarget::Before(index) => {
                return Err(ValidationError::TargetOutOfRange {
                    category: target_category,
                    index,
                    len: target_len,
                });
            }
        };

        let bookmark = self.categories[source_category]
            .entries
            .remove(source_index);
        self.categories[target_category]
            .entries
            .insert(insert_at, bookmark);
        Ok((target_category, insert_at))
    }

    /// List the duplicates [`Document::deduplicate`] would remove, without removing them
    pub fn find_duplicates(&self) -> DedupReport {
        dedup::scan(&self.categories)
    }

    /// Keep the first bookmark for each URL within every category.
    ///
    /// Returns the discarded entries. Categories left empty are not removed.
    pub fn deduplicate(&mut self) -> DedupReport {
        let report = dedup::scan(&self.categories);
        if !report.is_empty() {
            dedup::remove_duplicates(&mut self.categories);
        }
        report
    }

    /// Remove every category
    pub fn clear(&mut self) {
        self.categories.clear();
    }

    fn category_label(&self, name: &str) -> String {
        match name.trim() {
            "" => self.default_category.clone(),
            name => name.to_string(),
        }
    }

    fn check_category(&self, index: usize) -> Result<&Category, ValidationError> {
        self.categories
            .get(index)
            .ok_or(ValidationError::CategoryOutOfRange {
                index,
                len: self.categories.len(),
            })
    }

    pub(crate) fn check_bookmark(
        &self,
        category: usize,
        index: usize,
    ) -> Result<&Bookmark, ValidationError> {
        let entries = &self.check_category(category)?.entries;
        entries
            .get(index)
            .ok_or(ValidationError::BookmarkOutOfRange {
                category,
                index,
                len: entries.len(),
            })
    }
}

/// Trimmed value, or `None` when blank
fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn resolve_abbr(input: &str, url: &str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        return Ok(generate_abbreviation(url));
    }
    normalize_abbreviation(input)
        .ok_or_else(|| ValidationError::InvalidAbbreviation(input.trim().to_string()))
}
