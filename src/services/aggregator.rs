//! Per-record field extraction
//!
//! Combines tag extraction, platform detection and normalization into the
//! [`FieldMapping`] consumed by the filename template.

use std::sync::LazyLock;

use crate::parsers::{classify_platform, TagPattern};
use crate::services::normalizer::{normalize, parse_date, Category};
use crate::types::{
    FieldMapping, UNKNOWN_DATE, UNKNOWN_LOCATION, UNKNOWN_PLAYER, UNKNOWN_RANK, UNKNOWN_RESULT,
};

static DATE: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("DT"));
static BLACK_NAME: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("PB"));
static WHITE_NAME: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("PW"));
static BLACK_RANK: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("BR"));
static WHITE_RANK: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("WR"));
static RESULT: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("RE"));

/// First value of the tag; absent or blank values take the default
fn first_or(pattern: &TagPattern, text: &str, default: &str) -> String {
    pattern
        .find_first(text)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Extract and normalize every filename field from a record.
///
/// Always returns all seven fields. Missing or blank tags fall back to their
/// `unknown-*` default; unrecognised rank/result spellings are kept raw.
pub fn extract_fields(text: &str) -> FieldMapping {
    let date = parse_date(&first_or(&DATE, text, UNKNOWN_DATE));

    let blackname = first_or(&BLACK_NAME, text, UNKNOWN_PLAYER).trim().to_string();
    let whitename = first_or(&WHITE_NAME, text, UNKNOWN_PLAYER).trim().to_string();

    let blackrank = normalize(&first_or(&BLACK_RANK, text, UNKNOWN_RANK), Category::Ranks);
    let whiterank = normalize(&first_or(&WHITE_RANK, text, UNKNOWN_RANK), Category::Ranks);

    let result = normalize(&first_or(&RESULT, text, UNKNOWN_RESULT), Category::Results);

    let location = classify_platform(text).unwrap_or(UNKNOWN_LOCATION).to_string();

    FieldMapping {
        date,
        location,
        blackname,
        whitename,
        blackrank,
        whiterank,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> String {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name);
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_end_to_end_inline_record() {
        let text = "PB[Alice]PW[Bob]BR[5k]WR[3d]RE[B+Resign]DT[2021-01-02]PC[OGS: test]";
        let fields = extract_fields(text);
        assert_eq!(
            fields,
            FieldMapping {
                date: "2021-01-02".to_string(),
                location: "OGS".to_string(),
                blackname: "Alice".to_string(),
                whitename: "Bob".to_string(),
                blackrank: "5k".to_string(),
                whiterank: "3d".to_string(),
                result: "B+Resign".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_record_uses_defaults() {
        assert_eq!(extract_fields(""), FieldMapping::default());
    }

    #[test]
    fn test_defaults_are_distinct_per_field() {
        let fields = extract_fields("(;GM[1]FF[4])");
        assert_eq!(fields.date, "unknown-date");
        assert_eq!(fields.blackname, "unknown-player");
        assert_eq!(fields.whitename, "unknown-player");
        assert_eq!(fields.blackrank, "unknown-rank");
        assert_eq!(fields.whiterank, "unknown-rank");
        assert_eq!(fields.result, "unknown-result");
        assert_eq!(fields.location, "unknown-location");
    }

    #[test]
    fn test_names_are_trimmed_not_normalized() {
        let fields = extract_fields("(;PB[  Lee Sedol ]PW[\tKe Jie\n])");
        assert_eq!(fields.blackname, "Lee Sedol");
        assert_eq!(fields.whitename, "Ke Jie");
    }

    #[test]
    fn test_empty_tag_values_are_defaulted() {
        let fields = extract_fields("(;PB[]PW[  ]BR[]WR[\n]RE[]DT[]PC[OGS: x])");
        assert_eq!(fields.blackname, "unknown-player");
        assert_eq!(fields.whitename, "unknown-player");
        assert_eq!(fields.blackrank, "unknown-rank");
        assert_eq!(fields.whiterank, "unknown-rank");
        assert_eq!(fields.result, "unknown-result");
        assert_eq!(fields.date, "unknown-date");
        assert_eq!(fields.location, "OGS");
    }

    #[test]
    fn test_first_value_wins() {
        let fields = extract_fields("(;PB[First]PB[Second]RE[W+R]RE[B+T])");
        assert_eq!(fields.blackname, "First");
        assert_eq!(fields.result, "W+Resign");
    }

    #[test]
    fn test_question_mark_rank() {
        let fields = extract_fields("(;BR[?]WR[?])");
        assert_eq!(fields.blackrank, "unknown-rank");
        assert_eq!(fields.whiterank, "unknown-rank");
    }

    #[test]
    fn test_ogs_fixture() {
        let fields = extract_fields(&fixture("ogs.sgf"));
        assert_eq!(fields.location, "OGS");
        assert_eq!(fields.date, "2021-01-02");
        assert_eq!(fields.blackname, "Alice");
        assert_eq!(fields.whitename, "Bob");
        assert_eq!(fields.blackrank, "5k");
        assert_eq!(fields.whiterank, "3d");
        assert_eq!(fields.result, "B+Resign");
    }

    #[test]
    fn test_fox_fixture() {
        let fields = extract_fields(&fixture("fox.sgf"));
        assert_eq!(fields.location, "Fox");
        assert_eq!(fields.date, "2020-03-15 14.30");
        assert_eq!(fields.blackname, "棋手甲");
        assert_eq!(fields.whitename, "棋手乙");
        assert_eq!(fields.blackrank, "3d");
        assert_eq!(fields.whiterank, "5k");
        assert_eq!(fields.result, "B+4.5");
    }

    #[test]
    fn test_kgs_fixture() {
        let fields = extract_fields(&fixture("kgs.sgf"));
        assert_eq!(fields.location, "KGS");
        assert_eq!(fields.date, "2015-07-09");
        assert_eq!(fields.blackname, "black[bot]");
        assert_eq!(fields.whitename, "whiteplayer");
        assert_eq!(fields.blackrank, "2k");
        assert_eq!(fields.whiterank, "unknown-rank");
        assert_eq!(fields.result, "W+Time");
    }

    #[test]
    fn test_minimal_fixture() {
        let fields = extract_fields(&fixture("minimal.sgf"));
        assert_eq!(fields, FieldMapping::default());
    }
}
