//! Catalog error taxonomy.

use thiserror::Error;

/// Failure of one catalog call.
///
/// Per-attempt variants (`TransientNetwork`, `RateLimited`, `Upstream`)
/// are wrapped in `ExhaustedRetries` once the attempt budget is spent.
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// Missing credential or invalid client/caller configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection-level fault (DNS, reset, timeout) during one attempt.
    #[error("network error on attempt {attempt}: {source}")]
    TransientNetwork {
        /// 1-based attempt index.
        attempt: u32,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 429 on one attempt.
    #[error("rate limited (HTTP 429) on attempt {attempt}")]
    RateLimited {
        /// 1-based attempt index.
        attempt: u32,
    },

    /// Any other non-2xx status on one attempt.
    #[error("TMDB API error (HTTP {status}) on attempt {attempt}: {message}")]
    Upstream {
        /// 1-based attempt index.
        attempt: u32,
        /// HTTP status code.
        status: u16,
        /// TMDB `status_message`, or the raw body.
        message: String,
    },

    /// Attempt budget consumed without a successful response.
    #[error("gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: Box<CatalogError>,
    },

    /// A 2xx body that does not match the expected shape.
    #[error("failed to decode {path} response on attempt {attempt}: {source}")]
    Decode {
        /// 1-based attempt index of the successful response.
        attempt: u32,
        /// Endpoint path.
        path: String,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`CatalogError`], for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CatalogError::Configuration`].
    Configuration,
    /// See [`CatalogError::TransientNetwork`].
    TransientNetwork,
    /// See [`CatalogError::RateLimited`].
    RateLimited,
    /// See [`CatalogError::Upstream`].
    Upstream,
    /// See [`CatalogError::ExhaustedRetries`].
    ExhaustedRetries,
    /// See [`CatalogError::Decode`].
    Decode,
}

impl ErrorKind {
    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::TransientNetwork => "transient_network",
            Self::RateLimited => "rate_limited",
            Self::Upstream => "upstream",
            Self::ExhaustedRetries => "exhausted_retries",
            Self::Decode => "decode",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CatalogError {
    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::TransientNetwork { .. } => ErrorKind::TransientNetwork,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::ExhaustedRetries { .. } => ErrorKind::ExhaustedRetries,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Number of network attempts made before this error was returned.
    ///
    /// Configuration errors are raised before any request and report 0.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Configuration(_) => 0,
            Self::TransientNetwork { attempt, .. }
            | Self::RateLimited { attempt }
            | Self::Upstream { attempt, .. }
            | Self::Decode { attempt, .. } => *attempt,
            Self::ExhaustedRetries { attempts, .. } => *attempts,
        }
    }

    /// Kind of the innermost failure (the last attempt's, for exhausted retries).
    #[must_use]
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::ExhaustedRetries { last, .. } => last.root_kind(),
            other => other.kind(),
        }
    }

    /// HTTP status of the innermost failure, if it was an HTTP error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::ExhaustedRetries { last, .. } => last.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(attempt: u32, status: u16) -> CatalogError {
        CatalogError::Upstream {
            attempt,
            status,
            message: String::from("The resource you requested could not be found."),
        }
    }

    #[test]
    fn test_configuration_reports_zero_attempts() {
        // Arrange
        let err = CatalogError::Configuration(String::from("TMDB API token is not set"));

        // Act & Assert
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.attempts(), 0);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_exhausted_retries_exposes_last_failure() {
        // Arrange
        let err = CatalogError::ExhaustedRetries {
            attempts: 3,
            last: Box::new(upstream(3, 404)),
        };

        // Act & Assert
        assert_eq!(err.kind(), ErrorKind::ExhaustedRetries);
        assert_eq!(err.root_kind(), ErrorKind::Upstream);
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("gave up after 3 attempts"));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_rate_limited_status() {
        // Arrange
        let err = CatalogError::RateLimited { attempt: 2 };

        // Act & Assert
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.attempts(), 2);
        assert_eq!(err.kind().as_str(), "rate_limited");
    }

    #[test]
    fn test_kind_display() {
        // Arrange & Act & Assert
        assert_eq!(ErrorKind::TransientNetwork.to_string(), "transient_network");
        assert_eq!(ErrorKind::ExhaustedRetries.to_string(), "exhausted_retries");
    }
}
