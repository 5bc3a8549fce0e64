//! Side-effecting operations, isolated from the deterministic core.

pub mod input;
