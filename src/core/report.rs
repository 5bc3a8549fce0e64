//! Read-side summaries of final actor state.
//!
//! Pure consumer: built once from the registry after the scheduler halts,
//! never mutates anything. Actors are listed in name order so two runs over
//! the same input produce byte-identical reports.

use crate::core::registry::{Registry, RegistryError};
use crate::core::types::{ActorKind, Comparison, Token};

/// Final state of one exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangerSummary {
    pub name: String,
    /// Resident tokens at convergence, ascending.
    pub holding: Vec<Token>,
    /// Comparison events in recorded order.
    pub history: Vec<Comparison>,
}

/// Final state of one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    pub name: String,
    /// Accumulated tokens in arrival order.
    pub tokens: Vec<Token>,
}

/// Post-run snapshot of the whole actor graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub exchangers: Vec<ExchangerSummary>,
    pub sinks: Vec<SinkSummary>,
}

impl Report {
    pub fn from_registry(registry: &Registry) -> Self {
        let exchangers = registry
            .exchangers()
            .map(|(name, exchanger)| ExchangerSummary {
                name: name.to_string(),
                holding: exchanger.holding().to_vec(),
                history: exchanger.history().to_vec(),
            })
            .collect();
        let sinks = registry
            .sinks()
            .map(|(name, sink)| SinkSummary {
                name: name.to_string(),
                tokens: sink.tokens().to_vec(),
            })
            .collect();
        Self { exchangers, sinks }
    }

    /// Names of exchangers whose history contains the `(low, high)` pair.
    pub fn exchangers_comparing(&self, low: Token, high: Token) -> Vec<&str> {
        self.exchangers
            .iter()
            .filter(|summary| {
                summary
                    .history
                    .iter()
                    .any(|event| event.low == low && event.high == high)
            })
            .map(|summary| summary.name.as_str())
            .collect()
    }

    /// Product of the first token of each named sink.
    ///
    /// A name bound as an exchanger is a wrong-kind reference and fails; it
    /// is never coerced to the sink of the same name.
    pub fn sink_product(&self, names: &[String]) -> Result<u64, QueryError> {
        let mut product = 1u64;
        for name in names {
            let sink = self
                .sinks
                .iter()
                .find(|summary| &summary.name == name)
                .ok_or_else(|| {
                    if self.exchangers.iter().any(|summary| &summary.name == name) {
                        QueryError::Registry(RegistryError::UnknownActorKind {
                            name: name.clone(),
                            requested: ActorKind::Sink,
                            bound: ActorKind::Exchanger,
                        })
                    } else {
                        QueryError::Registry(RegistryError::UnknownActor { name: name.clone() })
                    }
                })?;
            let first = sink
                .tokens
                .first()
                .ok_or_else(|| QueryError::EmptySink { name: name.clone() })?;
            product = product
                .checked_mul(first.0)
                .ok_or(QueryError::ProductOverflow)?;
        }
        Ok(product)
    }
}

/// Failures of post-hoc report queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    Registry(RegistryError),
    EmptySink { name: String },
    ProductOverflow,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Registry(err) => err.fmt(f),
            QueryError::EmptySink { name } => write!(f, "sink '{name}' received no tokens"),
            QueryError::ProductOverflow => f.write_str("sink product overflows u64"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Registry(err) => Some(err),
            _ => None,
        }
    }
}
