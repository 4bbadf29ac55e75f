//! Formatting helpers for rendering catalog entities.
//!
//! Every helper accepts whatever upstream sent and degrades to a
//! placeholder instead of failing.

use chrono::{Datelike, NaiveDate};

/// Placeholder for a missing or unparsable value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a zero budget/revenue.
pub const NOT_DISCLOSED: &str = "Not disclosed";

/// Year of a `YYYY-MM-DD` release date.
#[must_use]
pub fn release_year(release_date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Release year, or "N/A".
#[must_use]
pub fn format_release_year(release_date: &str) -> String {
    release_year(release_date).map_or_else(|| String::from(NOT_AVAILABLE), |y| y.to_string())
}

/// Vote average with one decimal place.
#[must_use]
pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

/// Rating band used to colour a vote average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    /// 8.0 and above.
    High,
    /// 6.0 to below 8.0.
    Mid,
    /// Below 6.0.
    Low,
}

impl RatingTier {
    /// Band for `vote_average`.
    #[must_use]
    pub fn of(vote_average: f64) -> Self {
        if vote_average >= 8.0 {
            Self::High
        } else if vote_average >= 6.0 {
            Self::Mid
        } else {
            Self::Low
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

/// Runtime as "2h 19m", or "N/A" for 0.
#[must_use]
pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        return String::from(NOT_AVAILABLE);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// USD amount as "$63,000,000", or "Not disclosed" for 0.
#[must_use]
pub fn format_currency(amount: u64) -> String {
    if amount == 0 {
        return String::from(NOT_DISCLOSED);
    }
    format!("${}", format_count(amount))
}

/// Integer with `,` thousands separators.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len().saturating_sub(i)) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
