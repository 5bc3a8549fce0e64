//! Orchestration: read an instruction file, resolve it, snapshot the result.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::core::parser::parse_instructions;
use crate::core::registry::Registry;
use crate::core::report::Report;
use crate::core::scheduler::{Resolution, Scheduler};
use crate::io::input::read_trimmed_lines;

/// Everything a caller needs after one resolution run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Instructions successfully parsed.
    pub instructions: usize,
    /// Lines skipped as malformed.
    pub malformed: usize,
    pub resolution: Resolution,
    pub report: Report,
}

/// Parse the instruction file at `path` and drive it to convergence.
///
/// Per-line parse failures are warnings and the batch continues; an
/// unreadable file aborts before any parsing.
pub fn run_file(path: &Path) -> Result<RunSummary> {
    let lines = read_trimmed_lines(path)?;
    let parsed = parse_instructions(&lines);
    for bad in &parsed.malformed {
        warn!(line = bad.line_no, text = %bad.text, "skipping malformed instruction");
    }
    debug!(
        instructions = parsed.instructions.len(),
        malformed = parsed.malformed.len(),
        "instruction set parsed"
    );

    let instructions = parsed.instructions.len();
    let mut registry = Registry::new();
    let mut scheduler = Scheduler::new(parsed.instructions);
    let resolution = scheduler.run(&mut registry);
    if resolution.pending > 0 {
        warn!(
            pending = resolution.pending,
            "instruction set did not converge to completion"
        );
    }

    Ok(RunSummary {
        instructions,
        malformed: parsed.malformed.len(),
        resolution,
        report: Report::from_registry(&registry),
    })
}
