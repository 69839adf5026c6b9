use super::config::ConfigError;
use super::structure::{MergeError, StructureError};
use super::system::SystemBuildError;
use crate::core::forcefield::parameterization::ParameterizationError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::io::mol2::Mol2Error;
use crate::core::io::pdb::PdbError;
use crate::core::topology::registry::TemplateError;
use thiserror::Error;

/// Umbrella error for the assembly pipeline.
///
/// Every stage failure is fatal; there is no retry and no partial result.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ligand file error: {0}")]
    Ligand(#[from] Mol2Error),

    #[error("Protein file error: {0}")]
    Protein(#[from] PdbError),

    #[error("Force field error: {0}")]
    Forcefield(#[from] ParamLoadError),

    #[error("Residue template error: {0}")]
    Templates(#[from] TemplateError),

    #[error("Parameterization error: {0}")]
    Parameterization(#[from] ParameterizationError),

    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("System assembly error: {0}")]
    SystemBuild(#[from] SystemBuildError),

    #[error("Ligand '{0}' carries no 3D coordinates")]
    LigandMissingCoordinates(String),
}
