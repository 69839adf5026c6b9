//! # promix Core Library
//!
//! A library for assembling simulation-ready protein-ligand complexes: it reads
//! a small-molecule structure (MOL2) and a protein structure (PDB), assigns
//! force-field parameters to both, merges them into a single structure, and
//! builds a system object an integrator could consume.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`MolecularSystem`),
//!   the force-field parameter tables and term generation (`forcefield`), residue
//!   templates (`topology`), and file I/O for the supported structure formats.
//!
//! - **[`assembly`]: The Conversion Layer.** Owns the unified structure object
//!   (topology + interaction terms + unit-tagged positions), the structure merge
//!   operation, and the final `SimulationSystem` construction with its constraint
//!   options.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties
//!   `core` and `assembly` together into the complete load → parameterize → merge →
//!   assemble pipeline and is the entry point for end-users of the library.

pub mod assembly;
pub mod core;
pub mod workflows;
