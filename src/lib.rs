//! Fixed-point resolver for token-routing instruction networks.
//!
//! This crate simulates a network of named actors exchanging numbered tokens
//! according to an unordered list of conditional instructions. No dependency
//! edges are given: the scheduler discovers a feasible execution order by
//! repeatedly attempting every incomplete instruction until a full pass makes
//! zero progress. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (parsing, actor state, the
//!   resolution loop, reporting). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (instruction file reading).
//!
//! [`run`] coordinates core logic with I/O to implement the CLI.

pub mod core;
pub mod io;
pub mod logging;
pub mod run;
