//! Catalog client library for cinefeed.
//!
//! Reads now-playing/popular listings and per-title details from the
//! TMDB API and builds image CDN URLs.

/// TMDB movie catalog client.
pub mod catalog;
