// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::Args;
pub use output::format_report;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;

use crate::core::analyze_spectrum;
use crate::export;

/// Run the CLI end to end: load, analyze, print, export.
pub fn run() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let rows = export::read_signal(file)
        .with_context(|| format!("loading signal from {}", args.input.display()))?;

    let config = args
        .detection_config()
        .map_err(|reason| anyhow::anyhow!(reason))?;

    let report = analyze_spectrum(&rows, &config)
        .with_context(|| format!("analyzing {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Analyzing: {}", args.input.display().to_string().cyan());
        print!(
            "{}",
            format_report(&report, &args.input.display().to_string(), args.verbose)
        );
    }

    if let Some(path) = &args.export {
        let out = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::write_features(out, &report.features)?;
        println!("Feature table saved to: {}", path.display());
    }

    Ok(())
}
