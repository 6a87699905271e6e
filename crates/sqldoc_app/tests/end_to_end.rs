use std::fs;

use clap::Parser;
use sqldoc_app::cli::Cli;
use sqldoc_app::history::load_history;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_ID: &str = "0b5f3a9d-2b11-4c57-9a55-5f0c0b1e7d7c";

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

fn write_config(temp: &TempDir) -> std::path::PathBuf {
    let config = temp.path().join("sqldoc.ron");
    let log_file = temp.path().join("sqldoc.log");
    fs::write(
        &config,
        format!("(log: file, log_file: {:?}, max_attempts: Some(20))", log_file),
    )
    .unwrap();
    config
}

#[tokio::test]
async fn text_submission_polls_downloads_and_records_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translate/"))
        .respond_with(json(&format!(
            r#"{{"job_id":"{JOB_ID}","html_trans":"<p>Objective</p>","code_html":"<pre>1  select 1</pre>"}}"#
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/progress/{JOB_ID}/")))
        .respond_with(json(r#"{"status":"pending","progress":50}"#))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/progress/{JOB_ID}/")))
        .respond_with(json(&format!(
            r#"{{"status":"done","progress":100,"zip_url":"/media/tmp/{JOB_ID}.zip"}}"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/media/tmp/{JOB_ID}.zip")))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04".to_vec(), "application/zip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let out_dir = temp.path().join("results");
    let cli = Cli::try_parse_from([
        "sqldoc".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--server".to_string(),
        server.uri(),
        "--interval-ms".to_string(),
        "10".to_string(),
        "--download-dir".to_string(),
        out_dir.display().to_string(),
        "--text".to_string(),
        "select 1;".to_string(),
    ])
    .unwrap();

    let ok = sqldoc_app::run(cli).await.expect("run");

    assert!(ok);
    let archive = out_dir.join(format!("{JOB_ID}.zip"));
    assert_eq!(fs::read(&archive).unwrap(), b"PK\x03\x04");
    let history = load_history(&out_dir);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].saved_to.as_deref(), Some(archive.as_path()));
}

#[tokio::test]
async fn server_rejection_is_reported_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translate/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("sql_code or sql_file required"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let cli = Cli::try_parse_from([
        "sqldoc".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--server".to_string(),
        server.uri(),
        "--download-dir".to_string(),
        temp.path().display().to_string(),
        "--text".to_string(),
        "select 1;".to_string(),
    ])
    .unwrap();

    let ok = sqldoc_app::run(cli).await.expect("run");

    assert!(!ok);
    assert!(load_history(temp.path()).is_empty());
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let cli = Cli::try_parse_from([
        "sqldoc".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--file".to_string(),
        temp.path().join("missing.xlsx").display().to_string(),
    ])
    .unwrap();

    let err = sqldoc_app::run(cli).await.unwrap_err();
    assert!(format!("{err:#}").contains("reading input file"));
}
