//! Image CDN URL construction.

use std::fmt;
use std::str::FromStr;

use super::error::CatalogError;

/// Image size variants served by the TMDB image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    /// `w300`.
    W300,
    /// `w500`.
    #[default]
    W500,
    /// `w780`.
    W780,
    /// `original`.
    Original,
}

impl ImageSize {
    /// All variants, smallest first.
    pub const ALL: [Self; 4] = [Self::W300, Self::W500, Self::W780, Self::Original];

    /// Size token used in the URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| {
                CatalogError::Configuration(format!(
                    "unsupported image size '{s}' (expected one of: w300, w500, w780, original)"
                ))
            })
    }
}

/// Builds `{base}/{size}{path}`.
///
/// Returns an empty string when `path` is empty, which callers treat as
/// "no image". A trailing `/` on `base` is ignored.
#[must_use]
pub fn resolve_image_url(base: &str, path: &str, size: ImageSize) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("{}/{}{path}", base.trim_end_matches('/'), size.as_str())
}

/// Builds the `original`-size URL for `path`.
#[must_use]
pub fn resolve_original_image_url(base: &str, path: &str) -> String {
    resolve_image_url(base, path, ImageSize::Original)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_empty_path_is_empty_for_every_size() {
        // Arrange & Act & Assert
        for size in ImageSize::ALL {
            assert_eq!(resolve_image_url(BASE, "", size), "");
        }
    }

    #[test]
    fn test_resolve_concatenates_base_size_path() {
        // Arrange
        let path = "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg";

        // Act & Assert
        for size in ImageSize::ALL {
            assert_eq!(
                resolve_image_url(BASE, path, size),
                format!("{BASE}/{size}{path}")
            );
        }
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        // Arrange & Act
        let url = resolve_image_url("https://image.tmdb.org/t/p/", "/a.jpg", ImageSize::W300);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w300/a.jpg");
    }

    #[test]
    fn test_original_image_url() {
        // Arrange & Act
        let url = resolve_original_image_url(BASE, "/b.jpg");

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/original/b.jpg");
    }

    #[test]
    fn test_default_size_is_w500() {
        // Arrange & Act & Assert
        assert_eq!(ImageSize::default(), ImageSize::W500);
    }

    #[test]
    fn test_parse_size_tokens() {
        // Arrange & Act & Assert
        assert_eq!("w780".parse::<ImageSize>().unwrap(), ImageSize::W780);
        assert_eq!("original".parse::<ImageSize>().unwrap(), ImageSize::Original);
    }

    #[test]
    fn test_parse_rejects_unknown_size() {
        // Arrange & Act
        let result = "w1280".parse::<ImageSize>();

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
        assert!(err.to_string().contains("w1280"));
    }
}
