//! Homelinks - bookmark builder and editor for homepage dashboards
//!
//! Bookmarks are kept as an ordered list of categories, each holding an
//! ordered list of named links, and exchanged as the YAML layout read by
//! homepage dashboards. Two tools work on that model:
//!
//! - [`builder::LinkBuilder`] collects links into a persisted working copy,
//!   looking up titles and icons as links are added.
//! - [`editor::LinkEditor`] edits an existing configuration in memory and
//!   can discard all changes.

pub mod builder;
pub mod config;
pub mod document;
pub mod editor;
pub mod enrich;
pub mod format;
pub mod reports;
pub mod session;
pub mod storage;
pub mod utils;
