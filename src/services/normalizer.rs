//! Rank, result and date normalization
//!
//! Records come from many servers and locales, so the same rank or result is
//! spelled many ways. Each category has an ordered rule table; the first rule
//! whose pattern matches anywhere in the input decides the canonical value.
//! Input that no rule recognises is passed through unchanged.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex, RegexBuilder};

use Segment::{Group, Literal};

/// Piece of a replacement template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    /// Positional capture group; unmatched groups expand to nothing
    Group(usize),
}

/// Output of a rule, assembled from literals and capture groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement(pub &'static [Segment]);

impl Replacement {
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for segment in self.0 {
            match *segment {
                Literal(text) => out.push_str(text),
                Group(index) => {
                    if let Some(m) = caps.get(index) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }
}

/// Compiled (pattern, replacement) pair
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Expanded replacement if the pattern matches anywhere in `value`
    pub fn apply(&self, value: &str) -> Option<String> {
        self.pattern
            .captures(value)
            .map(|caps| self.replacement.expand(&caps))
    }
}

type RuleDef = (&'static str, &'static [Segment]);

const RANK_RULES: &[RuleDef] = &[
    (r"(\d+)段", &[Group(1), Literal("d")]),
    (r"(\d+)级", &[Group(1), Literal("k")]),
    (r"(\d+)級", &[Group(1), Literal("k")]),
    (r"(\d+)단", &[Group(1), Literal("d")]),
    (r"(\d+)급", &[Group(1), Literal("k")]),
    (r"[dp](\d)[pd]", &[Group(1), Literal("p")]),
    (r"^\?$", &[Literal("unknown-rank")]),
];

// The two generic English rules at the end always report a white win, even
// when the text names black. Kept as-is so existing filenames stay stable.
const RESULT_RULES: &[RuleDef] = &[
    ("没有结果", &[Literal("Unknown")]),
    ("黑中盘胜。", &[Literal("B+Resign")]),
    ("白中盘胜。", &[Literal("W+Resign")]),
    ("白方强退告负。", &[Literal("B+Forfeit")]),
    ("黑方强退告负。", &[Literal("W+Forfeit")]),
    (r"黑胜(\d+(\.5)?)目", &[Literal("B+"), Group(1)]),
    (r"白胜(\d+(\.5)?)目", &[Literal("W+"), Group(1)]),
    ("白方超时负", &[Literal("B+Time")]),
    ("黑方超时负", &[Literal("W+Time")]),
    ("和棋。", &[Literal("Draw")]),
    (r"^([BW])\+T$", &[Group(1), Literal("+Time")]),
    (r"^([BW])\+F$", &[Group(1), Literal("+Forfeit")]),
    (r"^([BW])\+R$", &[Group(1), Literal("+Resign")]),
    (r"[WB][a-z]+ (\d+[\.5]*)", &[Literal("W+"), Group(1)]),
    (r"[WB][a-z]+ w[oi]ns? by res", &[Literal("W+Resign")]),
];

fn compile(defs: &[RuleDef]) -> Vec<Rule> {
    defs.iter()
        .map(|&(pattern, segments)| Rule {
            pattern: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("normalization rule patterns are valid"),
            replacement: Replacement(segments),
        })
        .collect()
}

static RANKS: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(RANK_RULES));
static RESULTS: LazyLock<Vec<Rule>> = LazyLock::new(|| compile(RESULT_RULES));

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})\D*(\d\d|\d)\D*(\d{1,2})\D*((\d{1,2})\D+(\d\d)[-: ]*(\d\d)?)?")
        .expect("valid date regex")
});

/// Which rule table to normalize against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ranks,
    Results,
}

impl Category {
    /// Rules in priority order
    pub fn rules(self) -> &'static [Rule] {
        match self {
            Category::Ranks => &RANKS,
            Category::Results => &RESULTS,
        }
    }
}

/// Rewrite `value` into canonical form using the first matching rule.
///
/// # Examples
/// ```
/// use sgfrename::services::normalizer::{normalize, Category};
///
/// assert_eq!(normalize("3段", Category::Ranks), "3d");
/// assert_eq!(normalize("黑胜4.5目", Category::Results), "B+4.5");
/// assert_eq!(normalize("B+12.5", Category::Results), "B+12.5");
/// ```
pub fn normalize(value: &str, category: Category) -> String {
    for rule in category.rules() {
        if let Some(canonical) = rule.apply(value) {
            return canonical;
        }
    }
    log::trace!("no {:?} rule for {:?}, keeping raw value", category, value);
    value.to_string()
}

/// Parse a loosely formatted date into `YYYY-MM-DD` or `YYYY-MM-DD HH.MM`.
///
/// Any run of non-digits may separate the components. Input that does not
/// contain a valid calendar date is returned unchanged.
pub fn parse_date(value: &str) -> String {
    canonical_date(value).unwrap_or_else(|| {
        log::debug!("unparseable date {:?}, keeping raw value", value);
        value.to_string()
    })
}

fn canonical_date(value: &str) -> Option<String> {
    let caps = DATE_PATTERN.captures(value)?;
    let number = |index: usize| -> Option<u32> { caps.get(index)?.as_str().parse().ok() };

    let year = i32::try_from(number(1)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?;

    if caps.get(4).is_none() {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    let time = NaiveTime::from_hms_opt(number(5)?, number(6)?, 0)?;
    Some(date.and_time(time).format("%Y-%m-%d %H.%M").to_string())
}
