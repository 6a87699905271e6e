use std::fs;

use sqldoc_core::DownloadLink;
use sqldoc_engine::{DownloadError, DownloadSettings, FailureKind, ResultDownloader};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn relative_link_is_resolved_and_saved_under_its_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/tmp/9f1c.zip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04zip".to_vec(), "application/zip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let downloader = ResultDownloader::new(&server.uri(), &DownloadSettings::default()).unwrap();
    let link = DownloadLink::from_url("/media/tmp/9f1c.zip");

    let saved = downloader
        .download_to(&link, temp.path())
        .await
        .expect("download ok");

    assert_eq!(saved, temp.path().join("9f1c.zip"));
    assert_eq!(fs::read(saved).unwrap(), b"PK\x03\x04zip");
}

#[tokio::test]
async fn absolute_link_is_used_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/out.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip".to_vec()))
        .mount(&server)
        .await;

    let downloader =
        ResultDownloader::new("http://unused.invalid/app/", &DownloadSettings::default()).unwrap();
    let link = DownloadLink::from_url(format!("{}/files/out.zip", server.uri()));

    let bytes = downloader.fetch(&link).await.expect("fetch ok");
    assert_eq!(bytes, b"zip");
}

#[tokio::test]
async fn missing_archive_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/tmp/gone.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let downloader = ResultDownloader::new(&server.uri(), &DownloadSettings::default()).unwrap();
    let err = downloader
        .download_to(&DownloadLink::from_url("/media/tmp/gone.zip"), temp.path())
        .await
        .unwrap_err();

    match err {
        DownloadError::Api(api) => assert_eq!(api.kind, FailureKind::HttpStatus(404)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!temp.path().join("gone.zip").exists());
}

#[tokio::test]
async fn oversized_archive_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/tmp/big.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let settings = DownloadSettings {
        max_bytes: 16,
        ..DownloadSettings::default()
    };
    let downloader = ResultDownloader::new(&server.uri(), &settings).unwrap();
    let err = downloader
        .fetch(&DownloadLink::from_url("/media/tmp/big.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::TooLarge { max_bytes: 16 }));
}
