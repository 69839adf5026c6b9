use super::config::{ConstraintSpec, SystemOptions};
use super::structure::UnifiedStructure;
use crate::core::forcefield::interaction::{AngleTerm, BondTerm, NonBondedTerm, TorsionTerm};
use crate::core::models::ids::AtomId;
use crate::core::models::residue::ResidueKind;
use crate::core::utils::elements::atomic_mass;
use nalgebra::distance;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SystemBuildError {
    #[error("Unknown element '{element}' for atom '{atom_name}'; no mass available")]
    UnknownElement { element: String, atom_name: String },
}

/// A rigid distance constraint between two atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub atoms: [usize; 2],
    /// Constrained distance in the structure's length unit.
    pub distance: f64,
}

/// The final simulation-ready description of a merged structure.
///
/// Holds one particle per atom in structure order plus the interaction terms
/// and constraints derived from the assembly options. Atoms are never dropped
/// or reordered relative to the structure they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSystem {
    pub masses: Vec<f64>,
    pub nonbonded: Vec<NonBondedTerm>,
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub torsions: Vec<TorsionTerm>,
    pub constraints: Vec<DistanceConstraint>,
}

impl SimulationSystem {
    pub fn particle_count(&self) -> usize {
        self.masses.len()
    }
}

impl UnifiedStructure {
    /// Builds a [`SimulationSystem`] from this structure.
    ///
    /// Masses come from the element table; an element without a tabulated
    /// mass is fatal. Constraint options convert bond terms into rigid
    /// distance constraints; `rigid_water` additionally freezes each water
    /// molecule's internal geometry and drops its bonded terms.
    pub fn create_system(&self, options: &SystemOptions) -> Result<SimulationSystem, SystemBuildError> {
        let system = self.system();

        let mut masses = Vec::with_capacity(system.atom_count());
        for &atom_id in system.atoms_ordered() {
            let atom = system.atom(atom_id).unwrap();
            let mass = atomic_mass(&atom.element).ok_or_else(|| SystemBuildError::UnknownElement {
                element: atom.element.clone(),
                atom_name: atom.name.clone(),
            })?;
            masses.push(mass);
        }

        let index_of: HashMap<AtomId, usize> = system
            .atoms_ordered()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
        let is_hydrogen: Vec<bool> = system
            .atoms_ordered()
            .iter()
            .map(|&id| system.atom(id).unwrap().is_hydrogen())
            .collect();

        let interactions = self.interactions();
        let mut bonds = interactions.bonds.clone();
        let mut angles = interactions.angles.clone();
        let mut constraints = Vec::new();

        if options.rigid_water {
            self.constrain_waters(&index_of, &mut bonds, &mut angles, &mut constraints);
        }

        match options.constraints {
            ConstraintSpec::None => {}
            ConstraintSpec::HydrogenBonds => {
                bonds.retain(|bond| {
                    if bond.atoms.iter().any(|&a| is_hydrogen[a]) {
                        constraints.push(DistanceConstraint {
                            atoms: bond.atoms,
                            distance: bond.equilibrium_length,
                        });
                        false
                    } else {
                        true
                    }
                });
            }
            ConstraintSpec::AllBonds => {
                for bond in bonds.drain(..) {
                    constraints.push(DistanceConstraint {
                        atoms: bond.atoms,
                        distance: bond.equilibrium_length,
                    });
                }
            }
        }

        debug!(
            particles = masses.len(),
            bonds = bonds.len(),
            constraints = constraints.len(),
            "Assembled simulation system"
        );

        Ok(SimulationSystem {
            masses,
            nonbonded: interactions.nonbonded.clone(),
            bonds,
            angles,
            torsions: interactions.torsions.clone(),
            constraints,
        })
    }

    /// Replaces every water molecule's bonded terms with rigid distance
    /// constraints taken from the current geometry.
    fn constrain_waters(
        &self,
        index_of: &HashMap<AtomId, usize>,
        bonds: &mut Vec<BondTerm>,
        angles: &mut Vec<AngleTerm>,
        constraints: &mut Vec<DistanceConstraint>,
    ) {
        let system = self.system();
        let coords = self.positions().coords();
        let mut water_atoms: HashSet<usize> = HashSet::new();

        for (_, residue) in system.residues_iter() {
            if residue.kind != ResidueKind::Water {
                continue;
            }
            let mut oxygen = None;
            let mut hydrogens = Vec::new();
            for &atom_id in residue.atoms() {
                let atom = system.atom(atom_id).unwrap();
                let index = index_of[&atom_id];
                water_atoms.insert(index);
                if atom.element == "O" {
                    oxygen = Some(index);
                } else if atom.element == "H" {
                    hydrogens.push(index);
                }
            }

            if let Some(o) = oxygen {
                for &h in &hydrogens {
                    constraints.push(DistanceConstraint {
                        atoms: [o, h],
                        distance: distance(&coords[o], &coords[h]),
                    });
                }
            }
            if let [h1, h2] = hydrogens[..] {
                constraints.push(DistanceConstraint {
                    atoms: [h1, h2],
                    distance: distance(&coords[h1], &coords[h2]),
                });
            }
        }

        bonds.retain(|bond| !bond.atoms.iter().all(|a| water_atoms.contains(a)));
        angles.retain(|angle| !angle.atoms.iter().all(|a| water_atoms.contains(a)));
    }
}
