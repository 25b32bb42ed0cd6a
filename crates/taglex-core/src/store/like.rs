//! LIKE pattern escaping
//!
//! User-supplied substrings must never act as wildcards. Patterns built here
//! are meant for `LIKE ? ESCAPE '!'`.

/// Escape character used in generated LIKE patterns
pub const LIKE_ESCAPE: char = '!';

/// Escape `%`, `_` and the escape character itself
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Substring pattern: `%<escaped>%`
pub fn like_pattern(substring: &str) -> String {
    format!("%{}%", escape_like(substring))
}
