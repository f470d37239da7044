//! `northstar-session`: Interactive advisor session on the terminal.
//!
//! Reads commands from stdin (`help` lists them) and prints results to
//! stdout.
//!
//! **Usage:**
//! ```
//! northstar-session [--config <file>] [--model <file>] [--video <file>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use northstar_advisor::{console, Advisor, AdvisorConfig};

/// Run an interactive NorthStar advisor session.
#[derive(Parser)]
#[command(
    name = "northstar-session",
    about = "Run an interactive NorthStar advisor session"
)]
struct Args {
    /// Advisor config file (TOML). Falls back to $NORTHSTAR_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pipeline artifact, overriding the config.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Video file, overriding the config.
    #[arg(long)]
    video: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config =
        AdvisorConfig::resolve(args.config.as_deref())?.with_overrides(args.model, args.video);
    let advisor = Advisor::start(config)?;

    console::run(&advisor, io::stdin().lock(), io::stdout().lock())
}
