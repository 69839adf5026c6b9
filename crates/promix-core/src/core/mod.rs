//! # Core Module
//!
//! Fundamental building blocks for molecular complex assembly: the data
//! structures that represent molecular systems, the force-field parameter
//! tables and interaction-term generation, residue template knowledge, and
//! file I/O for the supported structure formats.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, bonds,
//!   and the `MolecularSystem` graph container
//! - **Force Field** ([`forcefield`]) - Parameter files and automatic assignment
//!   of nonbonded and bonded interaction terms
//! - **File I/O** ([`io`]) - Reading/writing MOL2 and PDB structure files
//! - **Structural Knowledge** ([`topology`]) - Residue templates for typing
//!   protein atoms and reconstructing their connectivity
//! - **Utilities** ([`utils`]) - Element data shared across the crate

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
