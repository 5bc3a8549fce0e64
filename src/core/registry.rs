//! Named-actor registry: lazy creation, kind-checked lookup, atomic routing.
//!
//! The registry is the single owner of all actor state during a run. It is
//! deliberately not thread-safe; one scheduling thread drives it. Names are
//! namespaced per kind (`bot 0` and `output 0` are distinct actors), and
//! maps are ordered so reports iterate actors in a stable name order.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::actor::{Exchanger, Sink, EXCHANGER_CAPACITY};
use crate::core::types::{ActorKind, Destination, Token};

/// Read-side lookup failures. Wrong-kind references are structural input
/// errors and must surface fatally, never be coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name exists, but bound to the other kind.
    UnknownActorKind {
        name: String,
        requested: ActorKind,
        bound: ActorKind,
    },
    /// No actor of any kind carries this name.
    UnknownActor { name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownActorKind {
                name,
                requested,
                bound,
            } => write!(
                f,
                "actor '{name}' referenced as {requested} but is bound as {bound}"
            ),
            RegistryError::UnknownActor { name } => write!(f, "unknown actor '{name}'"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// All actors created during one resolution run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    exchangers: BTreeMap<String, Exchanger>,
    sinks: BTreeMap<String, Sink>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the named exchanger, creating an empty one on first reference.
    pub fn exchanger(&mut self, name: &str) -> &mut Exchanger {
        self.exchangers.entry(name.to_string()).or_default()
    }

    /// Look up the named sink, creating an empty one on first reference.
    pub fn sink(&mut self, name: &str) -> &mut Sink {
        self.sinks.entry(name.to_string()).or_default()
    }

    /// Read-side exchanger lookup. Fails if the name is absent or bound as a
    /// sink.
    pub fn expect_exchanger(&self, name: &str) -> Result<&Exchanger, RegistryError> {
        match self.exchangers.get(name) {
            Some(exchanger) => Ok(exchanger),
            None if self.sinks.contains_key(name) => Err(RegistryError::UnknownActorKind {
                name: name.to_string(),
                requested: ActorKind::Exchanger,
                bound: ActorKind::Sink,
            }),
            None => Err(RegistryError::UnknownActor {
                name: name.to_string(),
            }),
        }
    }

    /// Read-side sink lookup. Fails if the name is absent or bound as an
    /// exchanger.
    pub fn expect_sink(&self, name: &str) -> Result<&Sink, RegistryError> {
        match self.sinks.get(name) {
            Some(sink) => Ok(sink),
            None if self.exchangers.contains_key(name) => Err(RegistryError::UnknownActorKind {
                name: name.to_string(),
                requested: ActorKind::Sink,
                bound: ActorKind::Exchanger,
            }),
            None => Err(RegistryError::UnknownActor {
                name: name.to_string(),
            }),
        }
    }

    /// Exchangers in name order.
    pub fn exchangers(&self) -> impl Iterator<Item = (&str, &Exchanger)> {
        self.exchangers
            .iter()
            .map(|(name, exchanger)| (name.as_str(), exchanger))
    }

    /// Sinks in name order.
    pub fn sinks(&self) -> impl Iterator<Item = (&str, &Sink)> {
        self.sinks.iter().map(|(name, sink)| (name.as_str(), sink))
    }

    /// Atomically move both tokens of a full exchanger to their destinations.
    ///
    /// All-or-nothing: both destinations are capacity-checked before anything
    /// is removed from the source, so no token is ever in flight or lost.
    /// Returns `false` (retry later) when the source is not full or either
    /// destination lacks capacity.
    pub fn try_route(&mut self, source: &str, low: &Destination, high: &Destination) -> bool {
        let Some((low_token, high_token)) = self.exchanger(source).sorted_pair() else {
            return false;
        };

        if !self.can_deliver(source, low, high) {
            return false;
        }

        let source_actor = self.exchanger(source);
        // Feasibility was checked above; a failed remove here would mean the
        // sorted pair lied about residency.
        debug_assert!(source_actor.is_full());
        source_actor.remove(low_token);
        source_actor.remove(high_token);

        self.deliver(low, low_token);
        self.deliver(high, high_token);
        true
    }

    /// Can both tokens land, given that the source empties first?
    fn can_deliver(&self, source: &str, low: &Destination, high: &Destination) -> bool {
        // Sinks are unbounded; only exchanger destinations can refuse.
        let mut demand: BTreeMap<&str, usize> = BTreeMap::new();
        for dest in [low, high] {
            if dest.kind == ActorKind::Exchanger {
                *demand.entry(dest.name.as_str()).or_insert(0) += 1;
            }
        }
        demand.into_iter().all(|(name, needed)| {
            let resident = if name == source {
                // Both tokens leave the source before any delivery lands.
                0
            } else {
                self.exchangers
                    .get(name)
                    .map_or(0, |exchanger| exchanger.holding().len())
            };
            EXCHANGER_CAPACITY - resident >= needed
        })
    }

    fn deliver(&mut self, dest: &Destination, token: Token) {
        match dest.kind {
            ActorKind::Exchanger => {
                let accepted = self.exchanger(&dest.name).accept(token);
                debug_assert!(accepted, "capacity was checked before delivery");
            }
            ActorKind::Sink => self.sink(&dest.name).accept(token),
        }
    }
}
