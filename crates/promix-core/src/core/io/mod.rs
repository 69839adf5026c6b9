//! Provides input/output functionality for molecular file formats.
//!
//! This module contains implementations for reading and writing the structure
//! file formats the assembly pipeline consumes: Tripos MOL2 for small
//! molecules and PDB for proteins. A unified trait-based interface keeps the
//! per-format metadata and error types next to their parsers.

pub mod mol2;
pub mod pdb;
pub mod traits;
