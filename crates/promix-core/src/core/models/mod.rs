//! # Core Models Module
//!
//! Data structures for representing molecular structures: atoms, residues,
//! chains, bonds, and the [`system::MolecularSystem`] container that ties them
//! together. These models are append-only during assembly; the pipeline never
//! resizes or reorders a system once it has been built.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with coordinates, types, and charges
//! - [`residue`] - Residue structure and classification
//! - [`chain`] - Chain organization and typing
//! - [`system`] - Complete molecular system with all components and relationships
//! - [`topology`] - Bond connectivity information
//! - [`builder`] - Serial-number-keyed construction helper used by the file parsers
//! - [`ids`] - Unique identifier types for atoms, residues, and chains

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
pub mod topology;
