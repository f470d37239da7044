//! `northstar-predict`: One prediction from command-line values.
//!
//! Unset fields keep their form defaults. Prints the label and the success
//! probability, or a JSON report with `--json`.
//!
//! **Usage:**
//! ```
//! northstar-predict [--power <W>] [--velocity <m/s>] [--hatch <um>] [--beam <um>]
//!                   [--layer <um>] [--d90 <um>] [--atmosphere <gas>]
//!                   [--nucleants <N1x>] [--atomization <method>] [--same-layer <0|1>]
//!                   [--json] [--html <file>] [--config <file>] [--model <file>] [--video <file>]
//! ```
//!
//! Exits non-zero if startup fails, a value is rejected, or the pipeline
//! cannot score the record.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use northstar_advisor::{console, Advisor, AdvisorConfig, Outcome, Report};

/// Run one NorthStar prediction.
#[derive(Parser)]
#[command(
    name = "northstar-predict",
    about = "Predict L-PBF print success for one set of process parameters"
)]
struct Args {
    /// Laser power [W].
    #[arg(long)]
    power: Option<String>,

    /// Scan velocity [m/s].
    #[arg(long)]
    velocity: Option<String>,

    /// Hatch spacing [um].
    #[arg(long)]
    hatch: Option<String>,

    /// Beam diameter [um].
    #[arg(long)]
    beam: Option<String>,

    /// Powder layer thickness [um].
    #[arg(long)]
    layer: Option<String>,

    /// Powder d90 [um].
    #[arg(long)]
    d90: Option<String>,

    /// Build atmosphere (Argon, Nitrogen).
    #[arg(long)]
    atmosphere: Option<String>,

    /// Nucleant additive (N11, N12, N13).
    #[arg(long)]
    nucleants: Option<String>,

    /// Atomization method (Gas, Water).
    #[arg(long)]
    atomization: Option<String>,

    /// Same layer scanned (0, 1).
    #[arg(long = "same-layer")]
    same_layer: Option<String>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Also write the rendered page with the result to this file.
    #[arg(long)]
    html: Option<PathBuf>,

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

impl Args {
    /// Field ids paired with the values given on the command line.
    fn edits(&self) -> Vec<(&'static str, &str)> {
        [
            ("power", &self.power),
            ("velocity", &self.velocity),
            ("hatch", &self.hatch),
            ("beam", &self.beam),
            ("layer", &self.layer),
            ("d90", &self.d90),
            ("atmosphere", &self.atmosphere),
            ("nucleants", &self.nucleants),
            ("atomization", &self.atomization),
            ("same-layer", &self.same_layer),
        ]
        .into_iter()
        .filter_map(|(id, value)| value.as_deref().map(|v| (id, v)))
        .collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AdvisorConfig::resolve(args.config.as_deref())?
        .with_overrides(args.model.clone(), args.video.clone());
    let advisor = Advisor::start(config)?;

    let mut session = advisor.new_session();
    for (id, value) in args.edits() {
        session.edit(id, value)?;
    }
    let outcome = advisor.trigger(&mut session).clone();

    if let Some(path) = &args.html {
        advisor.write_page(&session, path)?;
        log::info!("wrote {}", path.display());
    }

    let prediction = match outcome {
        Outcome::Predicted(prediction) => prediction,
        Outcome::Failed(message) => bail!("prediction failed: {}", message),
    };

    if args.json {
        let record = session.form().to_record();
        let report = Report::new(prediction, &record);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let precision = advisor.config().probability_precision;
        println!(
            "{}",
            console::describe_outcome(&Outcome::Predicted(prediction), precision)
        );
    }

    Ok(())
}
