use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// The wildcard atom type accepted at the outer positions of angle and
/// torsion keys.
pub const WILDCARD_TYPE: &str = "X";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct VdwParam {
    /// The van der Waals radius in Angstroms.
    pub radius: f64,
    /// The well depth parameter (epsilon) in kcal/mol.
    pub well_depth: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct BondParam {
    /// Harmonic force constant in kcal/mol/A^2.
    pub force_constant: f64,
    /// Equilibrium bond length in Angstroms.
    pub equilibrium_length: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct AngleParam {
    /// Harmonic force constant in kcal/mol/rad^2.
    pub force_constant: f64,
    /// Equilibrium angle in degrees.
    pub equilibrium_angle: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TorsionParam {
    /// Rotational barrier height in kcal/mol.
    pub barrier: f64,
    /// Periodicity of the torsional potential.
    pub periodicity: i32,
    /// Phase offset in degrees.
    pub phase: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GlobalParams {
    pub dielectric_constant: f64,
    /// Scaling applied to 1-4 electrostatic interactions.
    pub coulomb_scale_14: f64,
    /// Scaling applied to 1-4 van der Waals interactions.
    pub vdw_scale_14: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
struct ForcefieldFile {
    globals: GlobalParams,
    vdw: HashMap<String, VdwParam>,
    #[serde(default)]
    bond: HashMap<String, BondParam>,
    #[serde(default)]
    angle: HashMap<String, AngleParam>,
    #[serde(default)]
    torsion: HashMap<String, TorsionParam>,
}

/// A loaded force-field parameter set.
///
/// Bonded parameters are keyed by colon-joined atom-type tuples
/// (`"C.3:C.3"`, `"X:C.ar:C.ar:X"`); lookups try both orientations of the
/// key and, for angles and torsions, wildcard (`X`) outer positions.
#[derive(Debug, Clone)]
pub struct Forcefield {
    pub globals: GlobalParams,
    vdw: HashMap<String, VdwParam>,
    bonds: HashMap<String, BondParam>,
    angles: HashMap<String, AngleParam>,
    torsions: HashMap<String, TorsionParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

fn key(types: &[&str]) -> String {
    types.join(":")
}

impl Forcefield {
    /// Loads a force-field parameter set from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ParamLoadError::Io` if the file cannot be read (a missing
    /// parameter file halts the pipeline here, before any structure work
    /// depends on it) and `ParamLoadError::Toml` if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: ForcefieldFile = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(Self {
            globals: file.globals,
            vdw: file.vdw,
            bonds: file.bond,
            angles: file.angle,
            torsions: file.torsion,
        })
    }

    /// Looks up nonbonded parameters for a force-field atom type.
    pub fn vdw(&self, ff_type: &str) -> Option<&VdwParam> {
        self.vdw.get(ff_type)
    }

    /// Looks up bond parameters for a type pair, in either orientation.
    pub fn bond(&self, t1: &str, t2: &str) -> Option<&BondParam> {
        self.bonds
            .get(&key(&[t1, t2]))
            .or_else(|| self.bonds.get(&key(&[t2, t1])))
    }

    /// Looks up angle parameters for a type triple.
    ///
    /// Tries the exact key in both orientations, then wildcards on the outer
    /// types.
    pub fn angle(&self, t1: &str, t2: &str, t3: &str) -> Option<&AngleParam> {
        let candidates = [
            key(&[t1, t2, t3]),
            key(&[t3, t2, t1]),
            key(&[WILDCARD_TYPE, t2, t3]),
            key(&[t1, t2, WILDCARD_TYPE]),
            key(&[WILDCARD_TYPE, t2, t1]),
            key(&[t3, t2, WILDCARD_TYPE]),
            key(&[WILDCARD_TYPE, t2, WILDCARD_TYPE]),
        ];
        candidates.iter().find_map(|k| self.angles.get(k))
    }

    /// Looks up torsion parameters for a type quadruple.
    ///
    /// Tries the exact key in both orientations, then wildcards on the outer
    /// types (the usual form for generic torsions, e.g. `X:C.ar:C.ar:X`).
    pub fn torsion(&self, t1: &str, t2: &str, t3: &str, t4: &str) -> Option<&TorsionParam> {
        let candidates = [
            key(&[t1, t2, t3, t4]),
            key(&[t4, t3, t2, t1]),
            key(&[WILDCARD_TYPE, t2, t3, t4]),
            key(&[t1, t2, t3, WILDCARD_TYPE]),
            key(&[WILDCARD_TYPE, t3, t2, t1]),
            key(&[t4, t3, t2, WILDCARD_TYPE]),
            key(&[WILDCARD_TYPE, t2, t3, WILDCARD_TYPE]),
            key(&[WILDCARD_TYPE, t3, t2, WILDCARD_TYPE]),
        ];
        candidates.iter().find_map(|k| self.torsions.get(k))
    }
}
