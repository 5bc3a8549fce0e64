//! Deterministic, pure logic for the resolution engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod actor;
pub mod parser;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod types;
