//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use cinefeed_api::catalog::{ImageSize, MAX_ATTEMPTS, RetryPolicy};
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog endpoint and locale overrides.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Retry budget override.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// `[catalog]` section.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root, e.g. `https://api.themoviedb.org/3/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Image CDN root, e.g. `https://image.tmdb.org/t/p`.
    #[serde(default)]
    pub image_base_url: Option<String>,
    /// Locale for the popular listing.
    #[serde(default)]
    pub language: Option<String>,
    /// Poster size used by `details`.
    #[serde(default)]
    pub image_size: Option<String>,
}

/// `[retry]` section.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// if `catalog.image_size` names an unknown size, or if
    /// `retry.max_attempts` is outside `1..=3`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .image_size()
            .with_context(|| format!("invalid [catalog] image_size in {}", path.display()))?;
        if let Some(attempts) = config
            .retry
            .max_attempts
            .filter(|a| !(1..=MAX_ATTEMPTS).contains(a))
        {
            bail!(
                "invalid [retry] max_attempts in {}: {attempts} (expected 1..={MAX_ATTEMPTS})",
                path.display()
            );
        }
        Ok(config)
    }

    /// Configured poster size, or the default.
    ///
    /// # Errors
    ///
    /// Returns an error if `catalog.image_size` is not a known size.
    pub fn image_size(&self) -> Result<ImageSize> {
        match self.catalog.image_size.as_deref() {
            Some(raw) => Ok(raw.trim().parse::<ImageSize>()?),
            None => Ok(ImageSize::default()),
        }
    }

    /// Default policy with the configured attempt budget applied.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::default();
        match self.retry.max_attempts {
            Some(attempts) => policy.max_attempts(attempts),
            None => policy,
        }
    }
}
