//! Serializer for the homepage YAML layout

use std::borrow::Cow;

use serde_yaml::Value;

use crate::document::{Bookmark, Document, default_description, generate_abbreviation};

/// Characters that cannot start a plain scalar
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Words that YAML 1.1 readers resolve to booleans
const YAML11_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Longest key, in bytes, that libyaml accepts in implicit `key:` form
const MAX_IMPLICIT_KEY: usize = 1024;

/// Render a document as configuration text.
///
/// Categories and bookmarks keep their in-memory order. `icon` is omitted
/// when absent or blank; blank `abbr` and `description` are filled from the
/// URL so the output never carries empty values.
pub fn serialize(document: &Document) -> String {
    if document.is_empty() {
        return "[]\n".to_string();
    }

    let mut out = String::new();
    for category in document.categories() {
        if category.is_empty() {
            push_key(&mut out, 0, &category.name, Some("[]"));
            continue;
        }

        push_key(&mut out, 0, &category.name, None);
        for bookmark in &category.entries {
            write_bookmark(&mut out, bookmark);
        }
    }
    out
}

fn write_bookmark(out: &mut String, bookmark: &Bookmark) {
    let abbr = match bookmark.abbr.trim() {
        "" => generate_abbreviation(&bookmark.url),
        _ => bookmark.abbr.clone(),
    };
    let description = match bookmark.description.trim() {
        "" => default_description(&bookmark.url),
        _ => bookmark.description.clone(),
    };

    push_key(out, 4, &bookmark.name, None);
    out.push_str(&format!("        - abbr: {}\n", scalar(&abbr)));
    out.push_str(&format!("          href: {}\n", scalar(&bookmark.url)));
    if let Some(icon) = bookmark.icon.as_deref().filter(|icon| !icon.trim().is_empty()) {
        out.push_str(&format!("          icon: {}\n", scalar(icon)));
    }
    out.push_str(&format!("          description: {}\n", scalar(&description)));
}

/// Open a single-key mapping item at `indent`, with `inline` as its value if given.
///
/// Keys too long for the implicit form use the explicit `? key` / `: value` pair.
fn push_key(out: &mut String, indent: usize, key: &str, inline: Option<&str>) {
    let pad = " ".repeat(indent);
    let key = scalar(key);
    let value = inline.map(|value| format!(" {value}")).unwrap_or_default();
    if key.len() < MAX_IMPLICIT_KEY {
        out.push_str(&format!("{pad}- {key}:{value}\n"));
    } else {
        out.push_str(&format!("{pad}- ? {key}\n{pad}  :{value}\n"));
    }
}

/// Plain scalar when it reads back unchanged, double-quoted otherwise
fn scalar(text: &str) -> Cow<'_, str> {
    if is_plain_safe(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(double_quoted(text))
    }
}

fn is_plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if text.trim() != text || INDICATORS.contains(&first) {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    if text.chars().any(needs_escape) || YAML11_BOOLEANS.contains(&text) {
        return false;
    }
    // rules out null, booleans and numbers
    matches!(serde_yaml::from_str::<Value>(text), Ok(Value::String(parsed)) if parsed == text)
}

/// Control characters, Unicode line and paragraph separators, and the byte
/// order mark, which readers strip
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Category, EmptyCategoryPolicy};

    #[test]
    fn test_serialize_layout() {
        let mut document = Document::new(EmptyCategoryPolicy::RemoveEmpty);
        document
            .add_bookmark(
                "Developer",
                Bookmark::new("GitHub", "https://github.com")
                    .with_icon("https://github.com/favicon.ico"),
            )
            .unwrap();
        document
            .add_bookmark("Developer", Bookmark::new("VS Code", "https://code.visualstudio.com"))
            .unwrap();

        let expected = "\
- Developer:
    - GitHub:
        - abbr: GI
          href: https://github.com
          icon: https://github.com/favicon.ico
          description: github.com
    - VS Code:
        - abbr: CO
          href: https://code.visualstudio.com
          description: code.visualstudio.com
";
        assert_eq!(serialize(&document), expected);
    }

    #[test]
    fn test_serialize_omits_blank_icon() {
        let document = Document::from_categories(
            vec![Category::with_entries(
                "Media",
                vec![Bookmark::new("Netflix", "https://netflix.com").with_icon("   ")],
            )],
            EmptyCategoryPolicy::KeepEmpty,
        );
        let text = serialize(&document);
        assert!(!text.contains("icon"));
        assert_eq!(crate::format::deserialize(&text).unwrap(), document);
    }

    #[test]
    fn test_serialize_fills_blank_abbr_and_description() {
        let bookmark = Bookmark {
            name: "Rust".to_string(),
            abbr: String::new(),
            url: "https://www.rust-lang.org".to_string(),
            description: " ".to_string(),
            icon: None,
        };
        let document = Document::from_categories(
            vec![Category::with_entries("Lang", vec![bookmark])],
            EmptyCategoryPolicy::KeepEmpty,
        );
        let text = serialize(&document);
        assert!(text.contains("- abbr: RU\n"));
        assert!(text.contains("description: www.rust-lang.org\n"));
    }

    #[test]
    fn test_serialize_empty_forms() {
        let empty = Document::new(EmptyCategoryPolicy::KeepEmpty);
        assert_eq!(serialize(&empty), "[]\n");

        let document = Document::from_categories(
            vec![Category::new("Later")],
            EmptyCategoryPolicy::KeepEmpty,
        );
        assert_eq!(serialize(&document), "- Later: []\n");
    }

    #[test]
    fn test_scalar_quoting() {
        assert_eq!(scalar("GitHub"), "GitHub");
        assert_eq!(scalar("全球最大的代码托管平台"), "全球最大的代码托管平台");
        assert_eq!(scalar("https://example.com/#top"), "https://example.com/#top");
        assert_eq!(scalar("a: b"), "\"a: b\"");
        assert_eq!(scalar("true"), "\"true\"");
        assert_eq!(scalar("NO"), "\"NO\"");
        assert_eq!(scalar("42"), "\"42\"");
        assert_eq!(scalar(""), "\"\"");
        assert_eq!(scalar("say \"hi\""), "say \"hi\"");
        assert_eq!(scalar("\"hi\""), "\"\\\"hi\\\"\"");
        assert_eq!(scalar("bell\u{7}"), "\"bell\\u0007\"");
        assert_eq!(scalar("a\u{2028}b"), "\"a\\u2028b\"");
        assert_eq!(scalar("c\u{2029}d\u{85}e"), "\"c\\u2029d\\u0085e\"");
    }

    #[test]
    fn test_long_keys_use_explicit_form() {
        let long = "k".repeat(1100);
        let document = Document::from_categories(
            vec![
                Category::with_entries(
                    long.clone(),
                    vec![Bookmark::new(long.clone(), "https://docs.rs")],
                ),
                Category::new(long.clone()),
            ],
            EmptyCategoryPolicy::KeepEmpty,
        );
        let expected = format!(
            "\
- ? {long}
  :
    - ? {long}
      :
        - abbr: DO
          href: https://docs.rs
          description: docs.rs
- ? {long}
  : []
"
        );
        assert_eq!(serialize(&document), expected);
    }
}
