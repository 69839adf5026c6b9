//! Residue template knowledge: per-residue atom typing, partial charges, and
//! connectivity used to prepare protein structures for parameterization.

pub mod registry;
