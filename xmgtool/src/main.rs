mod args;
mod commands;

use anyhow::Result;
use args::{Args, Command};
use clap::Parser;
use tracing::debug;

fn init_logging(verbosity: u8) -> Result<()> {
    let log_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "xmgtool={0},xmg_codec={0},xmg_scene={0}",
                    log_level
                )
                .into()
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    debug!("Starting xmgtool {}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Info { file, json } => commands::info(&file, json).await,
        Command::Convert {
            file,
            output,
            no_limits,
        } => commands::convert(&file, output, no_limits).await,
        Command::Batch { dir, output, jobs } => commands::batch(&dir, &output, jobs).await,
        Command::Compose { config, output } => commands::compose(&config, &output).await,
    }
}
