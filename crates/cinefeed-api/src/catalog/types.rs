//! Catalog entities and the raw TMDB response shapes they are mapped from.

use serde::{Deserialize, Serialize};

// --- Domain ---

/// A single title as shown in a listing.
///
/// Text fields are never null: an absent upstream value is the empty
/// string, and an empty `poster_path` / `backdrop_path` means "no image".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Overview text.
    pub overview: String,
    /// Poster image path fragment (e.g. `/abc.jpg`).
    pub poster_path: String,
    /// Backdrop image path fragment.
    pub backdrop_path: String,
    /// Release date (YYYY-MM-DD), possibly empty or malformed.
    pub release_date: String,
    /// Vote average (0-10, upstream-trusted).
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u64,
    /// Popularity score.
    pub popularity: f64,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
}

/// Resolved genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Full details for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// Listing fields. `genre_ids` mirrors `genres`.
    pub movie: MovieSummary,
    /// Resolved genres.
    pub genres: Vec<Genre>,
    /// Runtime in minutes (0 = unknown).
    pub runtime_minutes: u32,
    /// Budget in USD (0 = undisclosed).
    pub budget: u64,
    /// Revenue in USD (0 = undisclosed).
    pub revenue: u64,
    /// Production status (e.g. "Released").
    pub status: Option<String>,
}

/// The two listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/popular`.
    Popular,
}

impl ListingKind {
    /// Endpoint path relative to the API root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::Popular => "movie/popular",
        }
    }

    /// Query pairs sent with the request. Only the popular listing is
    /// localized, and both read the first page only.
    #[must_use]
    pub fn query(self, language: &str) -> Vec<(&'static str, String)> {
        match self {
            Self::NowPlaying => Vec::new(),
            Self::Popular => vec![
                ("language", String::from(language)),
                ("page", String::from("1")),
            ],
        }
    }

    /// Operation name used in logs.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::NowPlaying => "list_now_playing",
            Self::Popular => "list_popular",
        }
    }
}

// --- Wire ---

/// Response from `movie/now_playing` and `movie/popular`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MovieListResponse {
    /// Results on the first page, decoded per entry. Absent is treated as empty.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

impl MovieListResponse {
    /// Maps the page, skipping entries that do not decode (a null `id`, say).
    pub fn into_movies(self) -> Vec<MovieSummary> {
        self.results
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<RawMovie>(entry) {
                Ok(raw) => Some(MovieSummary::from(raw)),
                Err(err) => {
                    tracing::warn!(index, error = %err, "Skipping malformed listing entry");
                    None
                }
            })
            .collect()
    }
}

/// A listing entry as TMDB sends it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMovieDetails {
    #[serde(flatten)]
    pub movie: RawMovie,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

impl From<RawMovie> for MovieSummary {
    fn from(raw: RawMovie) -> Self {
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            original_title: raw.original_title.unwrap_or_default(),
            overview: raw.overview.unwrap_or_default(),
            poster_path: raw.poster_path.unwrap_or_default(),
            backdrop_path: raw.backdrop_path.unwrap_or_default(),
            release_date: raw.release_date.unwrap_or_default(),
            vote_average: raw.vote_average.unwrap_or_default(),
            vote_count: raw.vote_count.unwrap_or_default(),
            popularity: raw.popularity.unwrap_or_default(),
            original_language: raw.original_language.unwrap_or_default(),
            genre_ids: raw.genre_ids.unwrap_or_default(),
        }
    }
}

impl From<RawMovieDetails> for MovieDetails {
    fn from(raw: RawMovieDetails) -> Self {
        let genres = raw.genres.unwrap_or_default();
        let mut movie = MovieSummary::from(raw.movie);
        if movie.genre_ids.is_empty() {
            movie.genre_ids = genres.iter().map(|g| g.id).collect();
        }
        Self {
            movie,
            genres,
            runtime_minutes: raw.runtime.unwrap_or_default(),
            budget: raw.budget.unwrap_or_default(),
            revenue: raw.revenue.unwrap_or_default(),
            status: raw.status.filter(|s| !s.is_empty()),
        }
    }
}
