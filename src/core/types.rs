//! Shared deterministic types for the resolution core.
//!
//! These types define stable contracts between core components. Instructions
//! are immutable once parsed; the scheduler tracks completion separately.

use std::fmt;

/// An opaque integral value routed through the actor network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u64);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two kinds of actor a name can be bound to.
///
/// Explicit tag rather than a boolean so destinations cannot be silently
/// inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// Holds up to two tokens, compares and forwards them.
    Exchanger,
    /// Accumulates tokens, never forwards.
    Sink,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Exchanger => f.write_str("exchanger"),
            ActorKind::Sink => f.write_str("sink"),
        }
    }
}

/// A kind-tagged recipient of a routed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub kind: ActorKind,
    pub name: String,
}

impl Destination {
    pub fn exchanger(name: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Exchanger,
            name: name.into(),
        }
    }

    pub fn sink(name: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Sink,
            name: name.into(),
        }
    }
}

/// One parsed instruction. Immutable; the scheduler owns completion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Deliver one token to a named exchanger.
    Supply { target: String, token: Token },
    /// Once the source exchanger holds two tokens, send the lower one to
    /// `low` and the higher one to `high`.
    Route {
        source: String,
        low: Destination,
        high: Destination,
    },
}

/// A `(low, high)` pair an exchanger was holding when it last emptied its
/// hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub low: Token,
    pub high: Token,
}
