//! Challenge rating normalization.
//!
//! Raw CR fields look like `"1/4"`, `"5"`, `"1/2 (100 XP)"`, or are missing.
//! [`clean_cr`] produces the display string and [`parse_cr`] the sort key.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Placeholder shown when a record has no challenge rating.
pub const UNKNOWN_CR: &str = "?";

static PAREN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("static pattern"));

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("static pattern")
});

/// Numeric sort key of a challenge rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CrValue {
    Sortable(f64),
    /// Missing or non-numeric; always orders after every sortable value.
    Unsortable,
}

impl CrValue {
    pub fn is_sortable(self) -> bool {
        matches!(self, CrValue::Sortable(_))
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            CrValue::Sortable(v) => Some(v),
            CrValue::Unsortable => None,
        }
    }

    /// Ascending order with `Unsortable` greater than everything else and
    /// equal to itself.
    pub fn cmp_for_sort(self, other: Self) -> Ordering {
        match (self, other) {
            (CrValue::Sortable(a), CrValue::Sortable(b)) => {
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (CrValue::Sortable(_), CrValue::Unsortable) => Ordering::Less,
            (CrValue::Unsortable, CrValue::Sortable(_)) => Ordering::Greater,
            (CrValue::Unsortable, CrValue::Unsortable) => Ordering::Equal,
        }
    }
}

/// Remove the first parenthesized group (the XP annotation) and trim.
fn strip_annotation(raw: &str) -> String {
    PAREN_SUFFIX.replace(raw, "").trim().to_string()
}

/// Display form of a CR: annotation stripped, `"?"` when there is nothing left.
pub fn clean_cr(raw: Option<&str>) -> String {
    let cleaned = raw.map(strip_annotation).unwrap_or_default();
    if cleaned.is_empty() {
        UNKNOWN_CR.to_string()
    } else {
        cleaned
    }
}

/// Sort key of a CR. Anything that does not parse is `Unsortable`, never zero.
pub fn parse_cr(raw: Option<&str>) -> CrValue {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return CrValue::Unsortable;
    };
    let cr = strip_annotation(raw);
    if cr == "0" {
        return CrValue::Sortable(0.0);
    }
    let value = if cr.contains('/') {
        parse_fraction(&cr)
    } else {
        parse_leading_number(&cr)
    };
    match value {
        Some(v) if v.is_finite() => CrValue::Sortable(v),
        _ => CrValue::Unsortable,
    }
}

fn parse_fraction(cr: &str) -> Option<f64> {
    let mut parts = cr.split('/');
    let num = parse_number(parts.next()?)?;
    let den = parse_number(parts.next()?)?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

fn parse_number(part: &str) -> Option<f64> {
    part.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_leading_number(cr: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(cr)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
