//! `northstar-page`: Writes the advisor page with default form values.
//!
//! **Outputs (`public/`):**
//! - `index.html`: Header, embedded video and the parameter form
//! - `css/style.css`: Stylesheet
//!
//! **Usage:**
//! ```
//! northstar-page [--out <path>] [--config <file>] [--model <file>] [--video <file>]
//! ```
//!
//! Exits non-zero, without writing anything, if the video or the model
//! artifact cannot be loaded.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use northstar_advisor::{generate, AdvisorConfig};

/// Generate the NorthStar process advisor page.
#[derive(Parser)]
#[command(
    name = "northstar-page",
    about = "Generate the NorthStar process advisor page"
)]
struct Args {
    /// Output directory for the generated page.
    #[arg(long, default_value = "public")]
    out: PathBuf,

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
    generate(&args.out, &config)?;

    println!("Advisor page generated successfully.");
    println!("  Output: {}", args.out.display());

    Ok(())
}
