#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("now-playing"))
        .stdout(predicate::str::contains("popular"))
        .stdout(predicate::str::contains("details"))
        .stdout(predicate::str::contains("image-url"));
}

#[test]
fn test_now_playing_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.args(["now-playing", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--original-language"));
}

#[test]
fn test_details_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.arg("details")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_image_url_resolves() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .args(["image-url", "--path", "/abc.jpg", "--size", "w300"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://image.tmdb.org/t/p/w300/abc.jpg",
        ));
}

#[test]
fn test_image_url_rejects_unknown_size() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.args(["image-url", "--path", "/abc.jpg", "--size", "w999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("w999"));
}

#[test]
fn test_listing_rejects_unknown_sort() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.args(["popular", "--sort", "random"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("random"));
}

#[test]
fn test_now_playing_without_token_is_empty_not_fatal() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.env_remove("TMDB_API_TOKEN")
        .env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .arg("now-playing")
        .assert()
        .success()
        .stdout(predicate::str::contains("No movies found"));
}

#[test]
fn test_details_without_token_reports_not_found() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.env_remove("TMDB_API_TOKEN")
        .env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .args(["details", "--id", "550"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie not found"))
        .stdout(predicate::str::contains("cinefeed now-playing"));
}

#[test]
fn test_invalid_config_image_size_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[catalog]\nimage_size = \"w999\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.env_remove("TMDB_API_TOKEN")
        .arg("--dir")
        .arg(dir.path())
        .args(["details", "--id", "550"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image_size"));
}

#[test]
fn test_config_env_points_at_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("custom.toml");
    std::fs::write(&file, "[retry]\nmax_attempts = 9\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefeed");
    cmd.env_remove("TMDB_API_TOKEN")
        .env("CINEFEED_CONFIG", &file)
        .arg("now-playing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_attempts"));
}
