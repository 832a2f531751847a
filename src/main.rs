//! docweave - Assemble a content tree into one ordered document
//!
//! docweave provides:
//! - Recursive scanning of an input directory
//! - YAML front-matter decoding with a numeric `weight` ordering hint
//! - Deterministic ordering and atomic output writes
//! - Unified output format for the manifest (jsonl/json/md)

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_tracing(&cli);
    cli::run(cli)
}
