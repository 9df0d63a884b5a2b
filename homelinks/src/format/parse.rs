//! Deserializer for the homepage YAML layout

use serde_yaml::{Mapping, Value};

use super::FormatError;
use crate::document::{
    Bookmark, Category, Document, EmptyCategoryPolicy, default_description,
    generate_abbreviation,
};

/// Parse configuration text into a document.
///
/// Missing `abbr`, `description` or `icon` get the same defaults
/// [`serialize`](super::serialize) would have written. Categories with the
/// same name stay separate. The result uses
/// [`EmptyCategoryPolicy::KeepEmpty`]; callers switch it with
/// [`Document::with_policy`].
pub fn deserialize(text: &str) -> Result<Document, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let items = match serde_yaml::from_str::<Value>(text)? {
        Value::Sequence(items) => items,
        Value::Null => return Err(FormatError::Empty),
        _ => return Err(FormatError::NotAList),
    };

    let mut categories = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let (name, value) = single_entry(item).ok_or(FormatError::InvalidCategory { index })?;
        categories.push(parse_category(name, value)?);
    }

    tracing::debug!(
        "Parsed {} categories with {} bookmarks",
        categories.len(),
        categories.iter().map(Category::len).sum::<usize>()
    );
    Ok(Document::from_categories(
        categories,
        EmptyCategoryPolicy::KeepEmpty,
    ))
}

fn parse_category(name: String, value: Value) -> Result<Category, FormatError> {
    let items = match value {
        Value::Sequence(items) => items,
        Value::Null => Vec::new(),
        _ => return Err(FormatError::InvalidBookmarkList { category: name }),
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Some((bookmark, value)) = single_entry(item).filter(|(key, _)| !key.trim().is_empty())
        else {
            return Err(FormatError::InvalidBookmark {
                category: name,
                index,
            });
        };
        let Some(details) = detail_record(value) else {
            return Err(FormatError::InvalidDetails {
                category: name,
                bookmark,
            });
        };
        entries.push(parse_bookmark(&name, bookmark, details)?);
    }

    Ok(Category::with_entries(name, entries))
}

fn parse_bookmark(category: &str, name: String, details: Mapping) -> Result<Bookmark, FormatError> {
    let mut href = None;
    let mut abbr = None;
    let mut description = None;
    let mut icon = None;

    for (key, value) in details {
        let Some(key) = scalar_text(&key) else {
            continue;
        };
        let slot = match key.as_str() {
            "href" => &mut href,
            "abbr" => &mut abbr,
            "description" => &mut description,
            "icon" => &mut icon,
            other => {
                tracing::debug!("Ignoring unknown field {other:?} of bookmark {name:?}");
                continue;
            }
        };
        *slot = field_text(&value).ok_or_else(|| FormatError::InvalidField {
            category: category.to_string(),
            bookmark: name.clone(),
            field: key.clone(),
        })?;
    }

    let Some(url) = href else {
        return Err(FormatError::MissingHref {
            category: category.to_string(),
            bookmark: name,
        });
    };

    Ok(Bookmark {
        abbr: abbr.unwrap_or_else(|| generate_abbreviation(&url)),
        description: description.unwrap_or_else(|| default_description(&url)),
        icon,
        url,
        name,
    })
}

/// Split a single-key mapping into its key text and value
fn single_entry(value: Value) -> Option<(String, Value)> {
    let Value::Mapping(mapping) = value else {
        return None;
    };
    if mapping.len() != 1 {
        return None;
    }
    let (key, value) = mapping.into_iter().next()?;
    Some((scalar_text(&key)?, value))
}

/// The detail record inside its one-element list
fn detail_record(value: Value) -> Option<Mapping> {
    let Value::Sequence(mut items) = value else {
        return None;
    };
    if items.len() != 1 {
        return None;
    }
    match items.pop()? {
        Value::Mapping(details) => Some(details),
        _ => None,
    }
}

/// Text of a scalar key. Numbers and booleans keep their textual form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Value of a detail field: `Some(None)` when blank or null, `None` when
/// the value is not a scalar.
fn field_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        _ => scalar_text(value).map(|text| (!text.trim().is_empty()).then_some(text)),
    }
}
