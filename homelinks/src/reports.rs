//! Plain-text rendering of documents and operation results

use crate::builder::BatchReport;
use crate::document::{DedupReport, Document};
use crate::utils::{plural, single_line, truncate_string};

const NAME_WIDTH: usize = 24;
const DESCRIPTION_WIDTH: usize = 48;

/// Card listing of a document with the indices commands expect
pub fn render_document(document: &Document) -> String {
    if document.is_empty() {
        return "No bookmarks yet.".to_string();
    }

    let mut lines = vec![format!(
        "{} in {}",
        plural(document.total_bookmarks(), "bookmark", "bookmarks"),
        plural(document.categories().len(), "category", "categories")
    )];

    for (ci, category) in document.categories().iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("[{ci}] {} ({})", category.name, category.len()));
        if category.is_empty() {
            lines.push("    (empty)".to_string());
        }
        for (bi, bookmark) in category.entries.iter().enumerate() {
            let name = truncate_string(&single_line(&bookmark.name), NAME_WIDTH);
            lines.push(format!(
                "  {ci}.{bi:<3} [{:<2}] {name:<NAME_WIDTH$}  {}",
                bookmark.abbr, bookmark.url
            ));
            let description =
                truncate_string(&single_line(&bookmark.description), DESCRIPTION_WIDTH);
            lines.push(format!("              {description}"));
            if let Some(icon) = &bookmark.icon {
                lines.push(format!("              icon: {icon}"));
            }
        }
    }

    lines.join("\n")
}

/// Duplicate listing in the form `Category: "Name" (url)`
pub fn dedup_summary(report: &DedupReport) -> String {
    if report.is_empty() {
        return "No duplicate bookmarks found.".to_string();
    }

    let mut lines = vec![format!(
        "Found {} in {}:",
        plural(report.len(), "duplicate bookmark", "duplicate bookmarks"),
        plural(report.affected_categories(), "category", "categories")
    )];
    for entry in &report.duplicates {
        lines.push(format!(
            "  {}: \"{}\" ({}) duplicates entry {}",
            entry.category, entry.name, entry.url, entry.kept_index
        ));
    }
    lines.join("\n")
}

/// One-line outcome of an add request, followed by skipped and failed inputs
pub fn batch_summary(report: &BatchReport) -> String {
    let mut lines = vec![format!(
        "Added {}",
        plural(report.added.len(), "bookmark", "bookmarks")
    )];
    if !report.skipped.is_empty() {
        lines[0].push_str(&format!(
            ", skipped {}",
            plural(report.skipped.len(), "invalid URL", "invalid URLs")
        ));
        for skipped in &report.skipped {
            lines.push(format!("  skipped: {skipped}"));
        }
    }
    for (url, error) in &report.failed {
        lines.push(format!("  failed: {url}: {error}"));
    }
    lines.join("\n")
}
