//! Instruction line grammars.
//!
//! Two line shapes are recognized:
//!
//! - `value <int> goes to bot <name>`
//! - `bot <name> gives low to (bot|output) <id> and high to (bot|output) <id>`
//!
//! Parsing is best-effort: lines matching neither grammar are skipped and
//! recorded so the caller can surface a warning, and the rest of the batch
//! still parses. Input order is preserved end to end; the scheduler's
//! tie-breaks depend on it.

use std::sync::LazyLock;

use crate::core::types::{ActorKind, Destination, Instruction, Token};

static SUPPLY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^value (\d+) goes to bot (\S+)$").unwrap());

static ROUTE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^bot (\S+) gives low to (bot|output) (\S+) and high to (bot|output) (\S+)$")
        .unwrap()
});

/// A line that matched neither grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-indexed position within the trimmed, non-empty input lines.
    pub line_no: usize,
    pub text: String,
}

/// Result of a best-effort parse over an instruction batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    pub instructions: Vec<Instruction>,
    pub malformed: Vec<MalformedLine>,
}

/// Parse trimmed, non-empty lines into instructions, preserving input order.
pub fn parse_instructions<S: AsRef<str>>(lines: &[S]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();

        if let Some(caps) = SUPPLY_RE.captures(line) {
            // \d+ can still overflow u64; treat that as malformed too.
            if let Ok(value) = caps[1].parse::<u64>() {
                outcome.instructions.push(Instruction::Supply {
                    target: caps[2].to_string(),
                    token: Token(value),
                });
                continue;
            }
        } else if let Some(caps) = ROUTE_RE.captures(line) {
            outcome.instructions.push(Instruction::Route {
                source: caps[1].to_string(),
                low: destination(&caps[2], &caps[3]),
                high: destination(&caps[4], &caps[5]),
            });
            continue;
        }

        outcome.malformed.push(MalformedLine {
            line_no: idx + 1,
            text: line.to_string(),
        });
    }

    outcome
}

fn destination(kind_word: &str, name: &str) -> Destination {
    // The regex only admits "bot" or "output" here.
    let kind = match kind_word {
        "bot" => ActorKind::Exchanger,
        _ => ActorKind::Sink,
    };
    Destination {
        kind,
        name: name.to_string(),
    }
}
