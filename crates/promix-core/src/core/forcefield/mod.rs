//! # Force Field Module
//!
//! Parameter management and interaction-term generation for molecular
//! complexes. This module does not evaluate energies; it assigns the
//! parameters an external integrator would need:
//!
//! - **Nonbonded parameters** (Lennard-Jones radius/well depth, partial
//!   charges) looked up per atom by force-field type
//! - **Bonded terms** (bonds, angles, proper torsions) generated from the
//!   molecular graph with type-keyed parameter lookup and wildcard fallback
//!
//! ## Key Components
//!
//! - [`params`] - Force field parameter file structures and loading
//! - [`interaction`] - The generated interaction-system description
//! - [`parameterization`] - Automatic assignment of parameters to a system

pub mod interaction;
pub mod parameterization;
pub mod params;
