use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::{LogDestination, LogSettings};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sqldoc_engine::{ClientSettings, DownloadSettings, PollSettings, Protocol};

use crate::cli::{Cli, LogTarget, ProtocolArg};

pub const DEFAULT_CONFIG_FILE: &str = "sqldoc.ron";

/// Settings read from `sqldoc.ron`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: String,
    pub protocol: ProtocolArg,
    pub poll_interval_ms: u64,
    pub max_attempts: Option<u32>,
    pub request_timeout_secs: u64,
    pub download: bool,
    pub download_dir: PathBuf,
    pub max_download_bytes: u64,
    pub log: LogTarget,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let poll = PollSettings::default();
        Self {
            server: client.base_url,
            protocol: ProtocolArg::Async,
            poll_interval_ms: poll.interval.as_millis() as u64,
            max_attempts: poll.max_attempts,
            request_timeout_secs: client.request_timeout.as_secs(),
            download: true,
            download_dir: PathBuf::from("."),
            max_download_bytes: DownloadSettings::default().max_bytes,
            log: LogTarget::File,
            log_file: PathBuf::from(engine_logging::DEFAULT_LOG_FILE),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `./sqldoc.ron` if it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Command-line flags win over the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(protocol) = cli.protocol {
            self.protocol = protocol;
        }
        if let Some(interval) = cli.interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(max) = cli.max_attempts {
            self.max_attempts = (max > 0).then_some(max);
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        if cli.no_download {
            self.download = false;
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server.clone(),
            protocol: match self.protocol {
                ProtocolArg::Async => Protocol::Async,
                ProtocolArg::Sync => Protocol::Sync,
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientSettings::default()
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_attempts: self.max_attempts,
        }
    }

    pub fn download_settings(&self) -> DownloadSettings {
        DownloadSettings {
            max_bytes: self.max_download_bytes,
            ..DownloadSettings::default()
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            destination: match self.log {
                LogTarget::File => LogDestination::File,
                LogTarget::Terminal => LogDestination::Terminal,
                LogTarget::Both => LogDestination::Both,
            },
            level: if self.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            file_path: self.log_file.clone(),
        }
    }
}
