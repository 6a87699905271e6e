use std::process::ExitCode;

use clap::Parser;
use sqldoc_app::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match sqldoc_app::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}
