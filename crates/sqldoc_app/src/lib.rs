//! sqldoc CLI: wires the controller to a terminal view, config file and result download.
pub mod cli;
pub mod config;
pub mod history;
pub mod terminal;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use sqldoc_core::DownloadLink;
use sqldoc_engine::{
    CancellationToken, Controller, JobOutcome, ReqwestTranslateApi, ResultDownloader, View,
};

use crate::cli::{Cli, InputArgs};
use crate::config::AppConfig;
use crate::history::{record_completed, HistoryEntry};
use crate::terminal::TerminalView;

/// Runs one submission. `Ok(false)` means the job failed or was cancelled.
pub async fn run(cli: Cli) -> Result<bool> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(&cli);
    engine_logging::initialize(&config.log_settings());
    engine_info!(
        "sqldoc starting: server={} protocol={:?}",
        config.server,
        config.protocol
    );

    let api = ReqwestTranslateApi::new(&config.client_settings())
        .with_context(|| format!("configuring client for {}", config.server))?;
    let mut controller = Controller::new(api, config.poll_settings());
    let mut view = TerminalView::new();
    load_input(&cli.input, &mut controller, &mut view)?;

    let cancel = CancellationToken::new();
    let teardown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            teardown.cancel();
        }
    });

    let outcome = controller.submit(&mut view, &cancel).await;
    view.finish();

    match outcome {
        JobOutcome::Completed(link) => {
            deliver(&config, &link).await?;
            Ok(true)
        }
        JobOutcome::Failed(message) => {
            engine_error!("Job failed: {}", message);
            if !view.error_shown() {
                eprintln!("{message}");
            }
            Ok(false)
        }
        JobOutcome::Cancelled => {
            engine_warn!("Cancelled before the job finished");
            eprintln!("Cancelled.");
            Ok(false)
        }
        JobOutcome::Rejected => bail!("nothing to submit: input is empty"),
    }
}

fn load_input(
    input: &InputArgs,
    controller: &mut Controller<ReqwestTranslateApi>,
    view: &mut dyn View,
) -> Result<()> {
    if let Some(path) = &input.file {
        let bytes =
            fs::read(path).with_context(|| format!("reading input file {}", path.display()))?;
        controller.select_file(upload_name(path), bytes, view);
    } else if let Some(text) = &input.text {
        controller.set_text(text.as_str(), view);
    } else if input.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading SQL from stdin")?;
        controller.set_text(text, view);
    }
    Ok(())
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.sql".to_string())
}

async fn deliver(config: &AppConfig, link: &DownloadLink) -> Result<()> {
    if !config.download {
        println!("{}", link.url);
        record_completed(
            &config.download_dir,
            HistoryEntry::new(link, None, Utc::now()),
        );
        return Ok(());
    }

    let downloader = ResultDownloader::new(&config.server, &config.download_settings())
        .with_context(|| format!("configuring download from {}", config.server))?;
    let saved = downloader
        .download_to(link, &config.download_dir)
        .await
        .with_context(|| format!("downloading {}", link.url))?;
    println!("Saved {}", saved.display());
    record_completed(
        &config.download_dir,
        HistoryEntry::new(link, Some(saved), Utc::now()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::upload_name;

    #[test]
    fn upload_name_is_the_file_name() {
        assert_eq!(upload_name(Path::new("/tmp/work/queries.xlsx")), "queries.xlsx");
        assert_eq!(upload_name(Path::new("/")), "upload.sql");
    }
}
