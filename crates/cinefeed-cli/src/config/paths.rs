//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Full path to a config file, overriding directory lookup.
pub const CONFIG_ENV: &str = "CINEFEED_CONFIG";

/// Resolves the config file path.
///
/// First match wins:
/// 1. `{dir}/config.toml` when `dir` is `Some`.
/// 2. `$CINEFEED_CONFIG`, used as the file path itself.
/// 3. `$XDG_CONFIG_HOME/cinefeed/config.toml` when it is an absolute path.
/// 4. `$HOME/.config/cinefeed/config.toml`.
///
/// Empty variables are ignored.
///
/// # Errors
///
/// Returns an error if no rule applies (no `dir`, and none of the
/// variables above is usable).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_with(dir, |name| std::env::var_os(name))
}

fn resolve_with<F>(dir: Option<&PathBuf>, env: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let non_empty = |name: &str| env(name).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(file) = non_empty(CONFIG_ENV) {
        return Ok(file);
    }
    // Relative values are invalid per the XDG base directory rules.
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME").filter(|p| p.is_absolute()) {
        return Ok(xdg.join("cinefeed").join("config.toml"));
    }
    if let Some(home) = non_empty("HOME") {
        return Ok(home.join(".config").join("cinefeed").join("config.toml"));
    }
    bail!("cannot locate config: set --dir, {CONFIG_ENV}, XDG_CONFIG_HOME or HOME")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<OsString> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| OsString::from(*v))
        }
    }

    #[test]
    fn test_dir_wins_over_environment() {
        // Arrange
        let dir = PathBuf::from("/srv/cinefeed");
        let env = env_of(&[(CONFIG_ENV, "/etc/cinefeed.toml"), ("HOME", "/home/u")]);

        // Act
        let path = resolve_with(Some(&dir), env).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/cinefeed/config.toml"));
    }

    #[test]
    fn test_config_env_is_used_as_file() {
        // Arrange
        let env = env_of(&[
            (CONFIG_ENV, "/etc/cinefeed.toml"),
            ("XDG_CONFIG_HOME", "/home/u/.xdg"),
            ("HOME", "/home/u"),
        ]);

        // Act
        let path = resolve_with(None, env).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/etc/cinefeed.toml"));
    }

    #[test]
    fn test_xdg_config_home_before_home() {
        // Arrange
        let env = env_of(&[("XDG_CONFIG_HOME", "/home/u/.xdg"), ("HOME", "/home/u")]);

        // Act
        let path = resolve_with(None, env).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.xdg/cinefeed/config.toml"));
    }

    #[test]
    fn test_empty_and_relative_values_fall_through() {
        // Arrange
        let env = env_of(&[
            (CONFIG_ENV, ""),
            ("XDG_CONFIG_HOME", "relative/xdg"),
            ("HOME", "/home/u"),
        ]);

        // Act
        let path = resolve_with(None, env).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/cinefeed/config.toml"));
    }

    #[test]
    fn test_no_usable_location_is_an_error() {
        // Arrange
        let env = env_of(&[("HOME", "")]);

        // Act
        let err = resolve_with(None, env).unwrap_err();

        // Assert
        assert!(err.to_string().contains(CONFIG_ENV));
    }
}
