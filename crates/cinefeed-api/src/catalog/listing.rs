//! Client-side sort and filter over a fetched listing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDate;

use super::types::MovieSummary;

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Release date, newest first. Missing or malformed dates go last.
    #[default]
    Newest,
    /// Popularity, highest first.
    Popularity,
    /// Vote average, highest first.
    Rating,
    /// Title, case-insensitive A-Z.
    Alphabetical,
}

impl SortOrder {
    /// Lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Popularity => "popularity",
            Self::Rating => "rating",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "popularity" => Ok(Self::Popularity),
            "rating" => Ok(Self::Rating),
            "alphabetical" => Ok(Self::Alphabetical),
            other => bail!(
                "unknown sort order '{other}' (expected newest, popularity, rating, alphabetical)"
            ),
        }
    }
}

/// Search, language filter, and sort applied to a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring of the title or original title.
    pub query: Option<String>,
    /// Exact original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Sort order.
    pub sort: SortOrder,
}

impl ListingFilter {
    /// Returns the matching titles in `sort` order. `movies` is untouched.
    #[must_use]
    pub fn apply(&self, movies: &[MovieSummary]) -> Vec<MovieSummary> {
        let needle = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let language = self
            .original_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let mut matched: Vec<MovieSummary> = movies
            .iter()
            .filter(|m| {
                needle.as_deref().is_none_or(|n| {
                    m.title.to_lowercase().contains(n)
                        || m.original_title.to_lowercase().contains(n)
                })
            })
            .filter(|m| language.is_none_or(|l| m.original_language.eq_ignore_ascii_case(l)))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Newest => matched.sort_by(|a, b| {
                // Some > None, so reversing puts dated titles first.
                parse_date(&b.release_date).cmp(&parse_date(&a.release_date))
            }),
            SortOrder::Popularity => {
                matched.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
            }
            SortOrder::Rating => {
                matched.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
            }
            SortOrder::Alphabetical => matched.sort_by(|a, b| {
                let by_title = a.title.to_lowercase().cmp(&b.title.to_lowercase());
                if by_title == Ordering::Equal {
                    a.id.cmp(&b.id)
                } else {
                    by_title
                }
            }),
        }
        matched
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
