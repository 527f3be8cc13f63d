//! SGF property value extraction
//!
//! A property looks like `PB[Alice]`. Inside a value, `]` only terminates the
//! value when it is not escaped with a backslash.

use regex::Regex;
use std::borrow::Cow;

/// Compiled matcher for every `TAG[value]` occurrence of one property
pub struct TagPattern {
    tag: String,
    regex: Regex,
}

impl TagPattern {
    pub fn new(tag: &str) -> Self {
        let pattern = format!(r"\b{}\[((?:[^\]\\]|\\(?s:.))*)\]", regex::escape(tag));
        Self {
            tag: tag.to_string(),
            regex: Regex::new(&pattern).expect("escaped tag always forms a valid regex"),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All values of this property, in order of appearance, with escapes removed
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| unescape(m.as_str()).into_owned())
            .collect()
    }

    /// First value of this property, if any
    pub fn find_first(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape(m.as_str()).into_owned())
    }
}

/// Extract every value of `tag` from `text`.
///
/// Compiles the pattern on each call; hold a [`TagPattern`] when scanning many records.
pub fn find_prop(text: &str, tag: &str) -> Vec<String> {
    TagPattern::new(tag).find_all(text)
}

/// Drop SGF escape backslashes: `\]` -> `]`, `\\` -> `\`
fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
