//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{MovieDetails, MovieSummary};

/// Best-effort catalog reads consumed by the render layer.
///
/// None of these fail: listings degrade to an empty `Vec` and details to
/// `None`, with the cause reported through `tracing`.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// First page of now-playing titles, or empty on failure.
    async fn list_now_playing(&self) -> Vec<MovieSummary>;

    /// First page of popular titles in the configured locale, or empty on failure.
    async fn list_popular(&self) -> Vec<MovieSummary>;

    /// Details for `id`, or `None` on failure.
    async fn get_details(&self, id: &str) -> Option<MovieDetails>;
}
