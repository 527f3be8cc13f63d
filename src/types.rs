//! Shared types: errors and the per-record field mapping

use serde::Serialize;
use thiserror::Error;

/// Default for a missing `DT` tag
pub const UNKNOWN_DATE: &str = "unknown-date";
/// Default for a missing `PB`/`PW` tag
pub const UNKNOWN_PLAYER: &str = "unknown-player";
/// Default for a missing `BR`/`WR` tag
pub const UNKNOWN_RANK: &str = "unknown-rank";
/// Default for a missing `RE` tag
pub const UNKNOWN_RESULT: &str = "unknown-result";
/// Location used when no platform signature matches
pub const UNKNOWN_LOCATION: &str = "unknown-location";

#[derive(Debug, Error)]
pub enum SgfRenameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SgfRenameError>;

/// One of the seven fields a filename template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Location,
    BlackName,
    WhiteName,
    BlackRank,
    WhiteRank,
    Result,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Date,
        Field::Location,
        Field::BlackName,
        Field::WhiteName,
        Field::BlackRank,
        Field::WhiteRank,
        Field::Result,
    ];

    /// Placeholder name used in templates and JSON output
    pub fn name(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Location => "location",
            Field::BlackName => "blackname",
            Field::WhiteName => "whitename",
            Field::BlackRank => "blackrank",
            Field::WhiteRank => "whiterank",
            Field::Result => "result",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Metadata extracted from one game record.
///
/// Every field is always populated, falling back to the `UNKNOWN_*` constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub date: String,
    pub location: String,
    pub blackname: String,
    pub whitename: String,
    pub blackrank: String,
    pub whiterank: String,
    pub result: String,
}

impl FieldMapping {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Location => &self.location,
            Field::BlackName => &self.blackname,
            Field::WhiteName => &self.whitename,
            Field::BlackRank => &self.blackrank,
            Field::WhiteRank => &self.whiterank,
            Field::Result => &self.result,
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            date: UNKNOWN_DATE.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
            blackname: UNKNOWN_PLAYER.to_string(),
            whitename: UNKNOWN_PLAYER.to_string(),
            blackrank: UNKNOWN_RANK.to_string(),
            whiterank: UNKNOWN_RANK.to_string(),
            result: UNKNOWN_RESULT.to_string(),
        }
    }
}
