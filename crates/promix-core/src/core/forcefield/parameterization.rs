use super::interaction::{AngleTerm, BondTerm, InteractionSystem, NonBondedTerm, TorsionTerm};
use super::params::Forcefield;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum ParameterizationError {
    #[error(
        "Missing VDW parameter for force field type '{ff_type}' on atom '{atom_name}' of residue {residue_name}"
    )]
    MissingVdwParams {
        ff_type: String,
        atom_name: String,
        residue_name: String,
    },
    #[error("Atom '{atom_name}' of residue {residue_name} has no force field type assigned")]
    UntypedAtom {
        atom_name: String,
        residue_name: String,
    },
    #[error("Missing bond parameters for type pair '{t1}:{t2}'")]
    MissingBondParams { t1: String, t2: String },
    #[error("Missing angle parameters for type triple '{t1}:{t2}:{t3}'")]
    MissingAngleParams {
        t1: String,
        t2: String,
        t3: String,
    },
    #[error("Missing torsion parameters for type quadruple '{t1}:{t2}:{t3}:{t4}'")]
    MissingTorsionParams {
        t1: String,
        t2: String,
        t3: String,
        t4: String,
    },
}

/// Assigns force-field parameters to a molecular system, producing its
/// interaction-system description.
///
/// The generated terms reference atoms by canonical-order index, one
/// nonbonded term per atom plus bond/angle/torsion terms derived from the
/// bond graph. Failure to match any atom or term to a parameter is fatal;
/// the pipeline produces no partial interaction systems.
pub struct Parameterizer<'a> {
    forcefield: &'a Forcefield,
}

impl<'a> Parameterizer<'a> {
    pub fn new(forcefield: &'a Forcefield) -> Self {
        Self { forcefield }
    }

    /// Generates the complete interaction system for `system`.
    ///
    /// Every atom must carry a force-field type (the MOL2 parser takes it
    /// from the SYBYL type column; protein atoms get theirs from residue
    /// templates before this step).
    pub fn parameterize(
        &self,
        system: &MolecularSystem,
    ) -> Result<InteractionSystem, ParameterizationError> {
        let index_of: HashMap<AtomId, usize> = system
            .atoms_ordered()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut interactions = InteractionSystem::default();
        self.assign_nonbonded(system, &mut interactions)?;
        self.generate_bond_terms(system, &index_of, &mut interactions)?;
        self.generate_angle_terms(system, &index_of, &mut interactions)?;
        self.generate_torsion_terms(system, &index_of, &mut interactions)?;

        debug!(
            atoms = interactions.nonbonded.len(),
            bonds = interactions.bonds.len(),
            angles = interactions.angles.len(),
            torsions = interactions.torsions.len(),
            "Generated interaction terms"
        );
        Ok(interactions)
    }

    fn assign_nonbonded(
        &self,
        system: &MolecularSystem,
        interactions: &mut InteractionSystem,
    ) -> Result<(), ParameterizationError> {
        for (index, (_, atom)) in system.atoms_iter().enumerate() {
            let residue_name = system
                .residue(atom.residue_id)
                .map(|r| r.name.clone())
                .unwrap_or_default();

            if atom.force_field_type.is_empty() {
                return Err(ParameterizationError::UntypedAtom {
                    atom_name: atom.name.clone(),
                    residue_name,
                });
            }

            let vdw = self.forcefield.vdw(&atom.force_field_type).ok_or_else(|| {
                ParameterizationError::MissingVdwParams {
                    ff_type: atom.force_field_type.clone(),
                    atom_name: atom.name.clone(),
                    residue_name,
                }
            })?;

            interactions.nonbonded.push(NonBondedTerm {
                atom: index,
                radius: vdw.radius,
                well_depth: vdw.well_depth,
                charge: atom.partial_charge,
            });
        }
        Ok(())
    }

    fn generate_bond_terms(
        &self,
        system: &MolecularSystem,
        index_of: &HashMap<AtomId, usize>,
        interactions: &mut InteractionSystem,
    ) -> Result<(), ParameterizationError> {
        for bond in system.bonds() {
            let t1 = &system.atom(bond.atom1_id).unwrap().force_field_type;
            let t2 = &system.atom(bond.atom2_id).unwrap().force_field_type;
            let param = self.forcefield.bond(t1, t2).ok_or_else(|| {
                ParameterizationError::MissingBondParams {
                    t1: t1.clone(),
                    t2: t2.clone(),
                }
            })?;
            interactions.bonds.push(BondTerm {
                atoms: [index_of[&bond.atom1_id], index_of[&bond.atom2_id]],
                force_constant: param.force_constant,
                equilibrium_length: param.equilibrium_length,
            });
        }
        Ok(())
    }

    fn generate_angle_terms(
        &self,
        system: &MolecularSystem,
        index_of: &HashMap<AtomId, usize>,
        interactions: &mut InteractionSystem,
    ) -> Result<(), ParameterizationError> {
        // One angle per unordered neighbor pair around each vertex atom.
        for &center in system.atoms_ordered() {
            let neighbors = system.get_bonded_neighbors(center).unwrap_or(&[]);
            for i in 0..neighbors.len() {
                for j in (i + 1)..neighbors.len() {
                    let (a, c) = (neighbors[i], neighbors[j]);
                    let t1 = &system.atom(a).unwrap().force_field_type;
                    let t2 = &system.atom(center).unwrap().force_field_type;
                    let t3 = &system.atom(c).unwrap().force_field_type;
                    let param = self.forcefield.angle(t1, t2, t3).ok_or_else(|| {
                        ParameterizationError::MissingAngleParams {
                            t1: t1.clone(),
                            t2: t2.clone(),
                            t3: t3.clone(),
                        }
                    })?;
                    interactions.angles.push(AngleTerm {
                        atoms: [index_of[&a], index_of[&center], index_of[&c]],
                        force_constant: param.force_constant,
                        equilibrium_angle: param.equilibrium_angle,
                    });
                }
            }
        }
        Ok(())
    }

    fn generate_torsion_terms(
        &self,
        system: &MolecularSystem,
        index_of: &HashMap<AtomId, usize>,
        interactions: &mut InteractionSystem,
    ) -> Result<(), ParameterizationError> {
        // One torsion per (i, j, k, l) path around each central bond (j, k).
        for bond in system.bonds() {
            let (j, k) = (bond.atom1_id, bond.atom2_id);
            let j_neighbors = system.get_bonded_neighbors(j).unwrap_or(&[]);
            let k_neighbors = system.get_bonded_neighbors(k).unwrap_or(&[]);
            for &i in j_neighbors {
                // Outer atoms must not be part of the central bond.
                if bond.contains(i) {
                    continue;
                }
                for &l in k_neighbors {
                    if bond.contains(l) || l == i {
                        continue;
                    }
                    let t1 = &system.atom(i).unwrap().force_field_type;
                    let t2 = &system.atom(j).unwrap().force_field_type;
                    let t3 = &system.atom(k).unwrap().force_field_type;
                    let t4 = &system.atom(l).unwrap().force_field_type;
                    let param = self.forcefield.torsion(t1, t2, t3, t4).ok_or_else(|| {
                        ParameterizationError::MissingTorsionParams {
                            t1: t1.clone(),
                            t2: t2.clone(),
                            t3: t3.clone(),
                            t4: t4.clone(),
                        }
                    })?;
                    interactions.torsions.push(TorsionTerm {
                        atoms: [index_of[&i], index_of[&j], index_of[&k], index_of[&l]],
                        barrier: param.barrier,
                        periodicity: param.periodicity,
                        phase: param.phase,
                    });
                }
            }
        }
        Ok(())
    }
}
