use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Submit SQL for translation into business documentation and fetch the results.
#[derive(Parser, Debug)]
#[command(name = "sqldoc", version)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    /// RON config file. Defaults to ./sqldoc.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the translation server.
    #[arg(long, env = "SQLDOC_SERVER")]
    pub server: Option<String>,

    #[arg(long, value_enum)]
    pub protocol: Option<ProtocolArg>,

    /// Milliseconds between status checks.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up after this many status checks (0 = never).
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Where the result archive and history are written.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Print the download link without fetching the archive.
    #[arg(long)]
    pub no_download: bool,

    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,
}

/// Exactly one input source.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// SQL workbook or script to upload.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// SQL text to submit.
    #[arg(long)]
    pub text: Option<String>,

    /// Read SQL text from standard input.
    #[arg(long)]
    pub stdin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolArg {
    /// Submit, then poll the job until it finishes.
    Async,
    /// Legacy endpoint that answers with the finished result.
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[cfg(test)]
mod tests {
    use super::{Cli, ProtocolArg};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn text_input_with_overrides() {
        let cli = Cli::try_parse_from([
            "sqldoc",
            "--text",
            "select 1",
            "--protocol",
            "sync",
            "--max-attempts",
            "5",
            "--no-download",
        ])
        .unwrap();
        assert_eq!(cli.input.text.as_deref(), Some("select 1"));
        assert_eq!(cli.protocol, Some(ProtocolArg::Sync));
        assert_eq!(cli.max_attempts, Some(5));
        assert!(cli.no_download);
    }

    #[test]
    fn input_sources_are_exclusive() {
        let err = Cli::try_parse_from(["sqldoc", "--text", "x", "--file", "q.xlsx"]);
        assert!(err.is_err());
    }

    #[test]
    fn an_input_source_is_required() {
        assert!(Cli::try_parse_from(["sqldoc"]).is_err());
    }
}
