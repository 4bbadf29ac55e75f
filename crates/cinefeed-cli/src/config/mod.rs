//! Application configuration module.
//!
//! Optional TOML overrides for the catalog endpoints, locale, poster
//! size and retry budget, found via `--dir`, `CINEFEED_CONFIG` or the XDG
//! config directory. The API token is never read from here.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
