//! Text helpers for terminal output

/// Truncates a string to a maximum character count with ellipsis.
///
/// Counts characters, not bytes, so CJK titles are cut on character
/// boundaries. The ellipsis counts toward `max_chars`.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let keep_chars = max_chars.saturating_sub(3);
    let truncated: String = s.chars().take(keep_chars).collect();
    format!("{}...", truncated.trim_end())
}

/// `count` followed by the singular or plural noun
pub fn plural(count: usize, one: &str, many: &str) -> String {
    let noun = if count == 1 { one } else { many };
    format!("{count} {noun}")
}

/// Collapse line breaks and runs of whitespace into single spaces
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
