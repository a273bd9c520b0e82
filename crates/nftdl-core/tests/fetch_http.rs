//! Integration tests: single-attempt fetches against a local HTTP server.

mod common;

use std::fs;
use std::time::Duration;

use common::asset_server::{self, Route};
use nftdl_core::fetch::{CurlFetcher, Fetch, FetchError, FetchOptions};
use tempfile::tempdir;

fn fetcher() -> CurlFetcher {
    CurlFetcher::new(FetchOptions {
        timeout: Duration::from_secs(5),
        ..FetchOptions::default()
    })
}

#[test]
fn extension_from_url_path_wins_over_media_type() {
    let base = asset_server::start(vec![("/img/cat.jpg", Route::typed("image/png", b"jpgbytes"))]);
    let dir = tempdir().unwrap();
    let target = dir.path().join("original").join("A1_original");

    let saved = fetcher()
        .fetch(&format!("{}/img/cat.jpg", base), &target, 0)
        .unwrap();

    assert_eq!(saved, dir.path().join("original").join("A1_original.jpg"));
    assert_eq!(fs::read(&saved).unwrap(), b"jpgbytes");
}

#[test]
fn extension_from_media_type_when_path_has_none() {
    let base = asset_server::start(vec![(
        "/asset/1",
        Route::typed("image/GIF; charset=binary", b"GIF89a"),
    )]);
    let dir = tempdir().unwrap();
    let target = dir.path().join("A_opensea");

    let saved = fetcher()
        .fetch(&format!("{}/asset/1?w=200", base), &target, 4)
        .unwrap();

    assert_eq!(saved, dir.path().join("A_opensea.gif"));
    assert_eq!(fs::read(&saved).unwrap(), b"GIF89a");
}

#[test]
fn default_extension_without_path_or_media_type() {
    let base = asset_server::start(vec![("/asset/2", Route::body(b"raw"))]);
    let dir = tempdir().unwrap();
    let saved = fetcher()
        .fetch(&format!("{}/asset/2", base), &dir.path().join("B"), 0)
        .unwrap();
    assert_eq!(saved, dir.path().join("B.png"));
}

#[test]
fn media_type_of_final_response_after_redirect() {
    let base = asset_server::start(vec![
        ("/final", Route::typed("image/gif", b"GIF89a")),
    ]);
    let redirect = asset_server::start(vec![("/r", Route::Redirect(format!("{}/final", base)))]);
    let dir = tempdir().unwrap();

    let saved = fetcher()
        .fetch(&format!("{}/r", redirect), &dir.path().join("C"), 0)
        .unwrap();

    assert_eq!(saved, dir.path().join("C.gif"));
    assert_eq!(fs::read(&saved).unwrap(), b"GIF89a");
}

#[test]
fn error_status_body_is_still_saved() {
    let base = asset_server::start(vec![]);
    let dir = tempdir().unwrap();
    let saved = fetcher()
        .fetch(&format!("{}/missing", base), &dir.path().join("D"), 0)
        .unwrap();
    assert_eq!(fs::read(&saved).unwrap(), b"not found");
}

#[test]
fn empty_body_creates_empty_file() {
    let base = asset_server::start(vec![("/empty.webp", Route::body(b""))]);
    let dir = tempdir().unwrap();
    let saved = fetcher()
        .fetch(&format!("{}/empty.webp", base), &dir.path().join("E"), 0)
        .unwrap();
    assert_eq!(saved, dir.path().join("E.webp"));
    assert_eq!(fs::metadata(&saved).unwrap().len(), 0);
}

#[test]
fn refused_connection_is_transport_error() {
    let dir = tempdir().unwrap();
    let err = fetcher()
        .fetch(
            &format!("{}/a.png", asset_server::closed_base()),
            &dir.path().join("F"),
            0,
        )
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }), "got {:?}", err);
    assert_eq!(err.kind(), "transport");
    assert!(!dir.path().join("F.png").exists());
}

#[test]
fn stalled_server_hits_time_budget() {
    let base = asset_server::start(vec![("/slow", Route::Hang)]);
    let dir = tempdir().unwrap();
    let fetcher = CurlFetcher::new(FetchOptions {
        timeout: Duration::from_secs(1),
        ..FetchOptions::default()
    });

    let started = std::time::Instant::now();
    let err = fetcher
        .fetch(&format!("{}/slow", base), &dir.path().join("G"), 0)
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout { .. }), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn unwritable_target_is_storage_error() {
    let base = asset_server::start(vec![("/a.png", Route::body(b"x"))]);
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"file, not a directory").unwrap();

    let err = fetcher()
        .fetch(&format!("{}/a.png", base), &blocker.join("H"), 0)
        .unwrap_err();

    assert!(matches!(err, FetchError::Storage { .. }), "got {:?}", err);
}
