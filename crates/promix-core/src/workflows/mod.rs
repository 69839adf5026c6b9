//! High-level workflows composing the core components into complete runs.

pub mod assemble;
