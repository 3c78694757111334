use std::{io::IsTerminal, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use gc_launcher::cli::CliArgs;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = CliArgs::parse();
    let report = args.launcher().run(args.workers.spawn_count()).await?;

    Ok(report.exit_code(args.exit_policy()))
}
