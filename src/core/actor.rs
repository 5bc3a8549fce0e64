//! Per-actor state: exchangers and sinks.

use crate::core::types::{Comparison, Token};

/// Maximum tokens an exchanger may hold at any observable instant.
pub const EXCHANGER_CAPACITY: usize = 2;

/// An actor that holds up to two tokens and can compare and forward them.
///
/// Residents are kept in ascending order, so whenever the exchanger is full
/// position 0 is the lower token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exchanger {
    holding: Vec<Token>,
    history: Vec<Comparison>,
}

impl Exchanger {
    /// Take a token iff there is capacity, keeping residents sorted.
    ///
    /// Returns `false` when full ("no capacity yet, retry later") — never an
    /// error.
    pub fn accept(&mut self, token: Token) -> bool {
        if self.holding.len() >= EXCHANGER_CAPACITY {
            return false;
        }
        self.holding.push(token);
        self.holding.sort();
        true
    }

    pub fn is_full(&self) -> bool {
        self.holding.len() == EXCHANGER_CAPACITY
    }

    /// The `(low, high)` pair currently held, if full.
    pub fn sorted_pair(&self) -> Option<(Token, Token)> {
        if self.is_full() {
            Some((self.holding[0], self.holding[1]))
        } else {
            None
        }
    }

    /// Remove one resident token. Returns `false` if the token is not held.
    pub fn remove(&mut self, token: Token) -> bool {
        match self.holding.iter().position(|held| *held == token) {
            Some(idx) => {
                self.holding.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Append a comparison event to the history log.
    pub fn record_comparison(&mut self, low: Token, high: Token) {
        self.history.push(Comparison { low, high });
    }

    pub fn holding(&self) -> &[Token] {
        &self.holding
    }

    pub fn history(&self) -> &[Comparison] {
        &self.history
    }
}

/// An actor that accumulates tokens in arrival order and never forwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sink {
    tokens: Vec<Token>,
}

impl Sink {
    /// Sinks are unbounded; accepting always succeeds.
    pub fn accept(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
