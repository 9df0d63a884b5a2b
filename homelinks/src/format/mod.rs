//! Homepage YAML configuration format
//!
//! The configuration is an ordered list of single-key mappings. Each key is
//! a category name and each value is an ordered list of single-key mappings
//! from bookmark name to a one-element list holding the detail record:
//!
//! ```yaml
//! - Developer:
//!     - GitHub:
//!         - abbr: GH
//!           href: https://github.com
//!           description: github.com
//! ```
//!
//! Names are mapping keys only in the text form. In memory they are plain
//! fields of [`Category`](crate::document::Category) and
//! [`Bookmark`](crate::document::Bookmark).

use thiserror::Error;

mod emit;
mod parse;

pub use emit::serialize;
pub use parse::deserialize;

/// Errors raised while reading a configuration
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("configuration is empty")]
    Empty,
    #[error("invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("top-level element must be a list of categories")]
    NotAList,
    #[error("category entry #{index} must be a mapping with a single name key")]
    InvalidCategory { index: usize },
    #[error("bookmarks of category {category:?} must be a list")]
    InvalidBookmarkList { category: String },
    #[error("bookmark entry #{index} in category {category:?} must be a mapping with a single name key")]
    InvalidBookmark { category: String, index: usize },
    #[error(
        "bookmark {bookmark:?} in category {category:?} must hold a one-element list with a detail record"
    )]
    InvalidDetails { category: String, bookmark: String },
    #[error("bookmark {bookmark:?} in category {category:?} has no href")]
    MissingHref { category: String, bookmark: String },
    #[error("field {field:?} of bookmark {bookmark:?} in category {category:?} must be a scalar")]
    InvalidField {
        category: String,
        bookmark: String,
        field: String,
    },
}
