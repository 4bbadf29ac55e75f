//! `CatalogClient` - TMDB catalog client implementation.

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::error::CatalogError;
use super::feed::RequestKey;
use super::image::{ImageSize, resolve_image_url, resolve_original_image_url};
use super::retry::{AttemptFailure, MAX_ATTEMPTS, RetryPolicy};
use super::types::{
    ListingKind, MovieDetails, MovieListResponse, MovieSummary, RawMovieDetails,
    TmdbErrorResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default root for image assets.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default locale for the popular listing.
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB catalog client.
///
/// Construct once at startup and share by reference; every call builds
/// its own request and owns its own retry loop.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// Root for image assets, without trailing `/`.
    image_base_url: String,
    /// Bearer API token. `None` makes every call fail pre-flight.
    api_token: Option<String>,
    /// Locale sent with the popular listing.
    language: String,
    /// Attempt budget and backoff.
    retry_policy: RetryPolicy,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    image_base_url: Option<String>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    retry_policy: Option<RetryPolicy>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            image_base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            retry_policy: None,
        }
    }

    /// Overrides the API base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the image CDN root (default: `https://image.tmdb.org/t/p`).
    #[must_use]
    pub fn image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = Some(url.into());
        self
    }

    /// Sets the API bearer token.
    ///
    /// Optional at build time: without it every call fails fast with
    /// [`CatalogError::Configuration`] and no request is sent.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the locale for the popular listing (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the retry policy (default: 3 attempts, 1000ms / 500ms steps).
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The base URL or image base URL is not an absolute http(s) URL.
    /// - The retry policy allows fewer than 1 or more than [`MAX_ATTEMPTS`] attempts.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        ensure_http(&base_url, "base_url")?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let image_base_url = self
            .image_base_url
            .unwrap_or_else(|| String::from(DEFAULT_IMAGE_BASE_URL));
        let parsed_image_base = Url::parse(&image_base_url)
            .with_context(|| format!("invalid image_base_url: {image_base_url}"))?;
        ensure_http(&parsed_image_base, "image_base_url")?;

        let retry_policy = self.retry_policy.unwrap_or_default();
        if !retry_policy.is_within_ceiling() {
            bail!(
                "retry policy must allow between 1 and {MAX_ATTEMPTS} attempts, got {}",
                retry_policy.attempt_budget()
            );
        }

        let api_token = self.api_token.filter(|t| !t.trim().is_empty());
        if api_token.is_none() {
            tracing::warn!("TMDB API token is not set; catalog requests will fail");
        }

        let language = self
            .language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            image_base_url: String::from(image_base_url.trim_end_matches('/')),
            api_token,
            language,
            retry_policy,
        })
    }
}

/// Rejects non-http(s) URLs.
fn ensure_http(url: &Url, field: &str) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{field} must be an http(s) URL: {url}");
    }
    Ok(())
}

/// Reports a failure absorbed into a safe default.
pub(crate) fn report_failure(operation: &str, err: &CatalogError) {
    tracing::error!(
        operation,
        kind = err.kind().as_str(),
        root_kind = err.root_kind().as_str(),
        attempts = err.attempts(),
        status = ?err.status(),
        error = %err,
        "Catalog request failed, returning safe default"
    );
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Locale sent with the popular listing.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Root for image assets.
    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Image URL for `path` at `size`; empty when `path` is empty.
    #[must_use]
    pub fn resolve_image_url(&self, path: &str, size: ImageSize) -> String {
        resolve_image_url(&self.image_base_url, path, size)
    }

    /// Full-size image URL for `path`; empty when `path` is empty.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        resolve_original_image_url(&self.image_base_url, path)
    }

    /// Fingerprint of the request [`Self::try_list`] sends for `kind`.
    #[must_use]
    pub fn listing_key(&self, kind: ListingKind) -> RequestKey {
        RequestKey::new(kind.path(), &kind.query(&self.language))
    }

    /// Fetches the first page of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Configuration`] without sending a request if
    /// no token is configured, [`CatalogError::ExhaustedRetries`] once the
    /// attempt budget is spent, or [`CatalogError::Decode`] if the body is
    /// not a listing.
    #[instrument(skip_all, fields(listing = kind.operation()))]
    pub async fn try_list(&self, kind: ListingKind) -> Result<Vec<MovieSummary>, CatalogError> {
        let query = kind.query(&self.language);
        let segments: Vec<&str> = kind.path().split('/').collect();
        let key = RequestKey::new(kind.path(), &query);

        let response: MovieListResponse = self.get_json(&key, &segments, &query).await?;
        Ok(response.into_movies())
    }

    /// Fetches details for one title.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_list`]; an empty `id` is a configuration error.
    #[instrument(skip_all, fields(%id))]
    pub async fn try_details(&self, id: &str) -> Result<MovieDetails, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::Configuration(String::from(
                "movie id must not be empty",
            )));
        }
        let key = RequestKey::new(&format!("movie/{id}"), &[]);

        let raw: RawMovieDetails = self.get_json(&key, &["movie", id], &[]).await?;
        Ok(MovieDetails::from(raw))
    }

    /// Sends a GET request with Bearer auth and decodes the JSON body.
    ///
    /// Makes at most `max_attempts` attempts. 429s, other error statuses,
    /// and transport faults all consume the same budget; see [`RetryPolicy`]
    /// for the waits in between.
    #[instrument(skip_all, fields(request = %key))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        key: &RequestKey,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let token = self.api_token.as_deref().ok_or_else(|| {
            CatalogError::Configuration(String::from(
                "TMDB API token is not set. Aborting request.",
            ))
        })?;
        let url = self.endpoint(segments)?;

        let mut attempt = 0u32;
        let mut previous_delay = None;
        loop {
            attempt = attempt.saturating_add(1);

            let err = match self.send_once(&url, query, token, attempt).await {
                Ok(body) => {
                    let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
                    return raw_result.map_err(|source| CatalogError::Decode {
                        attempt,
                        path: String::from(key.path()),
                        source,
                    });
                }
                Err(err) => err,
            };

            if self.retry_policy.is_last(attempt) {
                return Err(CatalogError::ExhaustedRetries {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let failure = if matches!(err, CatalogError::RateLimited { .. }) {
                AttemptFailure::RateLimited
            } else {
                AttemptFailure::Hard
            };
            let delay = self.retry_policy.delay(failure, attempt, previous_delay);
            tracing::warn!(
                attempt,
                max_attempts = self.retry_policy.attempt_budget(),
                kind = err.kind().as_str(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "TMDB API request failed. Retrying..."
            );
            tokio::time::sleep(delay).await;
            previous_delay = Some(delay);
        }
    }

    /// One attempt: returns the body of a 2xx response.
    async fn send_once(
        &self,
        url: &Url,
        query: &[(&str, String)],
        token: &str,
        attempt: u32,
    ) -> Result<String, CatalogError> {
        let request = self
            .http_client
            .get(url.clone())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);

        tracing::debug!(%url, attempt, "TMDB API request");

        let response = request
            .send()
            .await
            .map_err(|source| CatalogError::TransientNetwork { attempt, source })?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited { attempt });
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(error_response) => format!(
                    "code={}, message={}",
                    error_response.status_code, error_response.status_message
                ),
                Err(_) => body,
            };
            return Err(CatalogError::Upstream {
                attempt,
                status: status.as_u16(),
                message,
            });
        }

        response
            .text()
            .await
            .map_err(|source| CatalogError::TransientNetwork { attempt, source })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CatalogError::Configuration(format!(
                    "base_url cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn list_now_playing(&self) -> Vec<MovieSummary> {
        let kind = ListingKind::NowPlaying;
        self.try_list(kind).await.unwrap_or_else(|err| {
            report_failure(kind.operation(), &err);
            Vec::new()
        })
    }

    #[instrument(skip_all)]
    async fn list_popular(&self) -> Vec<MovieSummary> {
        let kind = ListingKind::Popular;
        self.try_list(kind).await.unwrap_or_else(|err| {
            report_failure(kind.operation(), &err);
            Vec::new()
        })
    }

    #[instrument(skip_all)]
    async fn get_details(&self, id: &str) -> Option<MovieDetails> {
        match self.try_details(id).await {
            Ok(details) => Some(details),
            Err(err) => {
                report_failure("get_details", &err);
                None
            }
        }
    }
}
