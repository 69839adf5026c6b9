use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Which bonds to replace with rigid distance constraints during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintSpec {
    /// Keep every bond as a harmonic term.
    #[default]
    None,
    /// Constrain bonds involving a hydrogen atom.
    HydrogenBonds,
    /// Constrain every bond.
    AllBonds,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown constraint specification '{0}' (expected none, h-bonds, or all-bonds)")]
pub struct ParseConstraintSpecError(String);

impl FromStr for ConstraintSpec {
    type Err = ParseConstraintSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "h-bonds" | "hbonds" => Ok(Self::HydrogenBonds),
            "all-bonds" | "allbonds" => Ok(Self::AllBonds),
            _ => Err(ParseConstraintSpecError(s.to_string())),
        }
    }
}

/// Options controlling how a merged structure becomes a simulation system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemOptions {
    pub constraints: ConstraintSpec,
    /// Replace water internal terms with rigid distance constraints.
    pub rigid_water: bool,
}

/// Fully resolved configuration for one assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub ligand_path: PathBuf,
    pub protein_path: PathBuf,
    pub forcefield_path: PathBuf,
    pub templates_path: PathBuf,
    pub options: SystemOptions,
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    ligand_path: Option<PathBuf>,
    protein_path: Option<PathBuf>,
    forcefield_path: Option<PathBuf>,
    templates_path: Option<PathBuf>,
    options: SystemOptions,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ligand_path(mut self, path: PathBuf) -> Self {
        self.ligand_path = Some(path);
        self
    }
    pub fn protein_path(mut self, path: PathBuf) -> Self {
        self.protein_path = Some(path);
        self
    }
    pub fn forcefield_path(mut self, path: PathBuf) -> Self {
        self.forcefield_path = Some(path);
        self
    }
    pub fn templates_path(mut self, path: PathBuf) -> Self {
        self.templates_path = Some(path);
        self
    }
    pub fn constraints(mut self, spec: ConstraintSpec) -> Self {
        self.options.constraints = spec;
        self
    }
    pub fn rigid_water(mut self, rigid: bool) -> Self {
        self.options.rigid_water = rigid;
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        Ok(AssemblyConfig {
            ligand_path: self
                .ligand_path
                .ok_or(ConfigError::MissingParameter("ligand_path"))?,
            protein_path: self
                .protein_path
                .ok_or(ConfigError::MissingParameter("protein_path"))?,
            forcefield_path: self
                .forcefield_path
                .ok_or(ConfigError::MissingParameter("forcefield_path"))?,
            templates_path: self
                .templates_path
                .ok_or(ConfigError::MissingParameter("templates_path"))?,
            options: self.options,
        })
    }
}
