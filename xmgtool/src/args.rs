use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xmgtool")]
#[command(about = "Inspect, convert and compose XMG images")]
#[command(version)]
pub struct Args {
    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the header, diagnostics and decode outcome of a file
    Info {
        /// XMG file to inspect
        file: PathBuf,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode one file to PNG
    Convert {
        /// XMG file to decode
        file: PathBuf,

        /// Output PNG path (defaults to the input with a .png extension)
        #[arg(short, long, value_name = "PNG")]
        output: Option<PathBuf>,

        /// Decode regardless of image size
        #[arg(long)]
        no_limits: bool,
    },

    /// Decode every .xmg file in a directory to PNG
    Batch {
        /// Directory to scan (not recursive)
        dir: PathBuf,

        /// Directory the PNG files are written to
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Worker threads (defaults to one per core)
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Render a scene file to PNG
    Compose {
        /// Scene description (TOML format)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Output PNG path
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,
    },
}
