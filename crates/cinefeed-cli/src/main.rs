//! cinefeed - browse now-playing and popular movies from the terminal.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use cinefeed_api::catalog::display::{
    NOT_AVAILABLE, RatingTier, format_count, format_currency, format_rating,
    format_release_year, format_runtime,
};
use cinefeed_api::catalog::{
    CatalogClient, ImageSize, ListingFilter, ListingKind, LocalCatalogApi, MovieDetails,
    MovieSummary, SortOrder, resolve_image_url,
};

/// Environment variable holding the TMDB bearer token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List movies now playing in theaters.
    NowPlaying(ListingArgs),
    /// List currently popular movies.
    Popular(ListingArgs),
    /// Show details for one movie.
    Details(DetailsArgs),
    /// Print the CDN URL for an image path.
    ImageUrl(ImageUrlArgs),
}

/// Arguments shared by the listing subcommands.
#[derive(clap::Args)]
struct ListingArgs {
    /// Sort order: newest, popularity, rating, alphabetical.
    #[arg(long, default_value = "newest")]
    sort: SortOrder,

    /// Case-insensitive title search.
    #[arg(long)]
    query: Option<String>,

    /// Keep only titles in this original language (e.g. "ja").
    #[arg(long)]
    original_language: Option<String>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID (e.g. 550).
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `image-url` subcommand.
#[derive(clap::Args)]
struct ImageUrlArgs {
    /// Image path as returned by the API (e.g. "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg").
    #[arg(long, required = true)]
    path: String,

    /// Image size: w300, w500, w780, original.
    #[arg(long, default_value = "w500")]
    size: ImageSize,

    /// Image CDN root (default: config or "https://image.tmdb.org/t/p").
    #[arg(long)]
    base_url: Option<String>,
}

/// Builds a `CatalogClient` from config and the `TMDB_API_TOKEN` environment variable.
///
/// A missing token is not an error here; the client then answers every
/// call with an empty result.
///
/// # Errors
///
/// Returns an error if a configured URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig) -> Result<CatalogClient> {
    let mut builder = CatalogClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .retry_policy(config.retry_policy());

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        builder = builder.api_token(token);
    }
    if let Some(raw) = config.catalog.base_url.as_deref() {
        let url = Url::parse(raw).with_context(|| format!("invalid [catalog] base_url: {raw}"))?;
        builder = builder.base_url(url);
    }
    if let Some(image_base) = config.catalog.image_base_url.as_deref() {
        builder = builder.image_base_url(image_base);
    }
    if let Some(language) = config.catalog.language.as_deref() {
        builder = builder.language(language);
    }

    builder.build().context("failed to build catalog client")
}

/// Loads `config.toml` from `dir` or the default location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    tracing::debug!(path = %path.display(), "Loading config");
    AppConfig::load(&path)
}

/// Fetches one listing.
async fn fetch_listing<C: LocalCatalogApi>(client: &C, kind: ListingKind) -> Vec<MovieSummary> {
    match kind {
        ListingKind::NowPlaying => client.list_now_playing().await,
        ListingKind::Popular => client.list_popular().await,
    }
}

/// Renders a listing as output lines.
fn listing_lines(movies: &[MovieSummary]) -> Vec<String> {
    if movies.is_empty() {
        return vec![String::from("No movies found")];
    }
    let mut lines = Vec::with_capacity(movies.len().saturating_add(2));
    lines.push(format!("{} movies found", movies.len()));
    lines.push(String::from("ID\tYear\tRating\tLang\tTitle"));
    for movie in movies {
        lines.push(format!(
            "{}\t{}\t{}\t{}\t{}",
            movie.id,
            format_release_year(&movie.release_date),
            format_rating(movie.vote_average),
            if movie.original_language.is_empty() {
                "-"
            } else {
                movie.original_language.as_str()
            },
            movie.title,
        ));
    }
    lines
}

/// Renders a details block as output lines.
fn details_lines(details: &MovieDetails, image_base_url: &str, size: ImageSize) -> Vec<String> {
    let movie = &details.movie;
    let mut lines = vec![format!(
        "{} ({})",
        movie.title,
        format_release_year(&movie.release_date)
    )];
    if !movie.original_title.is_empty() && movie.original_title != movie.title {
        lines.push(format!("Original title: {}", movie.original_title));
    }
    lines.push(format!(
        "Rating: {} ({} votes, {})",
        format_rating(movie.vote_average),
        format_count(movie.vote_count),
        RatingTier::of(movie.vote_average).as_str(),
    ));
    lines.push(format!("Runtime: {}", format_runtime(details.runtime_minutes)));
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    lines.push(format!(
        "Genres: {}",
        if genres.is_empty() {
            String::from(NOT_AVAILABLE)
        } else {
            genres.join(", ")
        }
    ));
    lines.push(format!("Budget: {}", format_currency(details.budget)));
    lines.push(format!("Revenue: {}", format_currency(details.revenue)));
    lines.push(format!(
        "Status: {}",
        details.status.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    let poster = resolve_image_url(image_base_url, &movie.poster_path, size);
    lines.push(format!(
        "Poster: {}",
        if poster.is_empty() {
            NOT_AVAILABLE
        } else {
            poster.as_str()
        }
    ));
    if !movie.overview.is_empty() {
        lines.push(String::new());
        lines.push(movie.overview.clone());
    }
    lines
}

/// Lines shown when a details lookup comes back empty.
fn not_found_lines(id: &str) -> Vec<String> {
    vec![
        format!("Movie not found: {}", id.trim()),
        String::from("Run `cinefeed now-playing` to browse available titles."),
    ]
}

fn emit(lines: &[String]) {
    for line in lines {
        tracing::info!("{line}");
    }
}

/// Runs the `now-playing` / `popular` subcommands.
#[instrument(skip_all, fields(listing = kind.operation()))]
async fn run_listing<C: LocalCatalogApi>(
    client: &C,
    kind: ListingKind,
    args: &ListingArgs,
) -> Vec<String> {
    let movies = fetch_listing(client, kind).await;
    let filter = ListingFilter {
        query: args.query.clone(),
        original_language: args.original_language.clone(),
        sort: args.sort,
    };
    listing_lines(&filter.apply(&movies))
}

/// Runs the `details` subcommand.
#[instrument(skip_all)]
async fn run_details<C: LocalCatalogApi>(
    client: &C,
    args: &DetailsArgs,
    image_base_url: &str,
    size: ImageSize,
) -> Vec<String> {
    match client.get_details(&args.id).await {
        Some(details) => details_lines(&details, image_base_url, size),
        None => not_found_lines(&args.id),
    }
}

/// Runs the `image-url` subcommand.
fn run_image_url(args: &ImageUrlArgs, config: &AppConfig) -> String {
    let base = args
        .base_url
        .as_deref()
        .or(config.catalog.image_base_url.as_deref())
        .unwrap_or("https://image.tmdb.org/t/p");
    let url = resolve_image_url(base, &args.path, args.size);
    if url.is_empty() {
        String::from(NOT_AVAILABLE)
    } else {
        url
    }
}

/// Installs the global `tracing` subscriber.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if the config is invalid or the client cannot be built.
/// Empty or missing catalog results are not errors.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.dir.as_ref())?;

    let lines = match cli.command {
        Commands::NowPlaying(args) => {
            let client = build_catalog_client(&config)?;
            run_listing(&client, ListingKind::NowPlaying, &args).await
        }
        Commands::Popular(args) => {
            let client = build_catalog_client(&config)?;
            run_listing(&client, ListingKind::Popular, &args).await
        }
        Commands::Details(args) => {
            let client = build_catalog_client(&config)?;
            let size = config.image_size()?;
            run_details(&client, &args, client.image_base_url(), size).await
        }
        Commands::ImageUrl(args) => vec![run_image_url(&args, &config)],
    };
    emit(&lines);

    Ok(())
}
