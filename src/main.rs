//! Token-routing network resolver.
//!
//! Reads an instruction file, drives the instruction set to its fixed point,
//! and prints per-actor summaries plus any post-hoc queries the caller asked
//! for on the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tokenflow::core::types::Token;
use tokenflow::logging;
use tokenflow::run::{run_file, RunSummary};

#[derive(Parser)]
#[command(
    name = "tokenflow",
    version,
    about = "Fixed-point resolver for token-routing instruction sets"
)]
struct Cli {
    /// Instruction file, one instruction per line.
    input: PathBuf,

    /// Report which exchangers compared this pair, e.g. `--find-pair 17,61`.
    #[arg(long, value_name = "LOW,HIGH", value_parser = parse_pair)]
    find_pair: Option<(u64, u64)>,

    /// Print the product of the first token of each named sink.
    #[arg(long = "product", value_name = "SINK")]
    product: Vec<String>,
}

fn parse_pair(raw: &str) -> Result<(u64, u64), String> {
    let (low, high) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LOW,HIGH, got '{raw}'"))?;
    let low = low
        .trim()
        .parse::<u64>()
        .map_err(|err| format!("bad low value '{low}': {err}"))?;
    let high = high
        .trim()
        .parse::<u64>()
        .map_err(|err| format!("bad high value '{high}': {err}"))?;
    Ok((low, high))
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_file(&cli.input)?;

    print_report(&summary);

    if let Some((low, high)) = cli.find_pair {
        let matches = summary
            .report
            .exchangers_comparing(Token(low), Token(high));
        if matches.is_empty() {
            println!("no exchanger compared {low} <> {high}");
        }
        for name in matches {
            println!("exchanger {name} compared {low} <> {high}");
        }
    }

    if !cli.product.is_empty() {
        let product = summary.report.sink_product(&cli.product)?;
        println!("sink product: {product}");
    }

    Ok(())
}

fn print_report(summary: &RunSummary) {
    println!("Summary of the Exchangers");
    println!("=========================");
    for exchanger in &summary.report.exchangers {
        println!("## Exchanger {}", exchanger.name);
        println!("   Holding: {:?}", token_values(&exchanger.holding));
        println!("   Comparison History:");
        for event in &exchanger.history {
            println!("      {} <> {}", event.low, event.high);
        }
    }

    println!();
    println!("Summary of the Sinks");
    println!("====================");
    for sink in &summary.report.sinks {
        println!("Sink {}: {:?}", sink.name, token_values(&sink.tokens));
    }

    println!();
    println!(
        "instructions: {} parsed, {} malformed, {} completed in {} passes",
        summary.instructions,
        summary.malformed,
        summary.resolution.completed,
        summary.resolution.passes,
    );
    if summary.resolution.pending > 0 {
        println!(
            "{} instructions never executed",
            summary.resolution.pending
        );
    }
}

fn token_values(tokens: &[Token]) -> Vec<u64> {
    tokens.iter().map(|token| token.0).collect()
}
