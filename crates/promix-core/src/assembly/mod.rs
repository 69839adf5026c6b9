//! Structure assembly: combining parameterized structures and turning the
//! result into a simulation-ready system description.

pub mod config;
pub mod error;
pub mod structure;
pub mod system;
