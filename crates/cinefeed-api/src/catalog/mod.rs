//! TMDB movie catalog module.
//!
//! Issues the now-playing, popular, and details reads against TMDB API v3
//! with a bounded retry policy, and maps the responses into
//! [`MovieSummary`] / [`MovieDetails`].

mod api;
mod client;
pub mod display;
mod error;
mod feed;
mod image;
mod listing;
mod retry;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{CatalogError, ErrorKind};
pub use feed::{LatestOnly, RequestKey, Ticket};
pub use image::{ImageSize, resolve_image_url, resolve_original_image_url};
pub use listing::{ListingFilter, SortOrder};
pub use retry::{AttemptFailure, MAX_ATTEMPTS, RetryPolicy};
pub use types::{Genre, ListingKind, MovieDetails, MovieSummary};
