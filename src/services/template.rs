//! Filename templates with `$field` placeholders
//!
//! Syntax: `$name` or `${name}` substitutes a field, `$$` is a literal `$`.
//! Placeholder names are checked when the template is parsed, so a bad
//! format string fails before any file is touched.

use crate::types::{Field, FieldMapping, Result, SgfRenameError};

/// Default naming scheme
pub const DEFAULT_FORMAT: &str =
    "$date - $location - $blackname [$blackrank] - $whitename [$whiterank] - $result";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(Field),
}

/// Parsed filename template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    pieces: Vec<Piece>,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl NameTemplate {
    pub fn parse(format: &str) -> Result<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = format;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                literal.push('$');
                rest = tail;
                continue;
            }

            let (name, tail) = if let Some(braced) = after.strip_prefix('{') {
                let end = braced.find('}').ok_or_else(|| {
                    SgfRenameError::Template(format!("unclosed '${{' at byte {}", pos))
                })?;
                (&braced[..end], &braced[end + 1..])
            } else {
                let end = after
                    .char_indices()
                    .find(|&(i, c)| if i == 0 { !is_ident_start(c) } else { !is_ident_char(c) })
                    .map(|(i, _)| i)
                    .unwrap_or(after.len());
                (&after[..end], &after[end..])
            };

            if name.is_empty() {
                return Err(SgfRenameError::Template(format!(
                    "invalid placeholder at byte {}",
                    pos
                )));
            }

            let field = Field::from_name(name).ok_or_else(|| {
                let known: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
                SgfRenameError::Template(format!(
                    "unknown field '{}' (expected one of: {})",
                    name,
                    known.join(", ")
                ))
            })?;

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Field(field));
            rest = tail;
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { pieces })
    }

    pub fn render(&self, fields: &FieldMapping) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field(field) => out.push_str(fields.get(*field)),
            }
        }
        out
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT).expect("default format is valid")
    }
}
