use crate::core::forcefield::interaction::InteractionSystem;
use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Physical unit of a coordinate array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Angstrom,
    Nanometer,
}

impl LengthUnit {
    /// Scale factor converting a value in `self` to a value in `target`.
    pub fn conversion_factor(self, target: LengthUnit) -> f64 {
        match (self, target) {
            (LengthUnit::Angstrom, LengthUnit::Nanometer) => 0.1,
            (LengthUnit::Nanometer, LengthUnit::Angstrom) => 10.0,
            _ => 1.0,
        }
    }
}

/// An ordered coordinate array with an explicit length unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Positions {
    coords: Vec<Point3<f64>>,
    unit: LengthUnit,
}

impl Positions {
    pub fn new(coords: Vec<Point3<f64>>, unit: LengthUnit) -> Self {
        Self { coords, unit }
    }

    pub fn coords(&self) -> &[Point3<f64>] {
        &self.coords
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Converts the coordinates to `target` in place.
    pub fn convert_to(&mut self, target: LengthUnit) {
        let factor = self.unit.conversion_factor(target);
        if factor != 1.0 {
            for point in &mut self.coords {
                *point *= factor;
            }
        }
        self.unit = target;
    }
}

#[derive(Debug, Error)]
pub enum StructureError {
    #[error(
        "Atom count mismatch: topology has {topology} atoms, interactions cover {interactions}, positions hold {positions}"
    )]
    AtomCountMismatch {
        topology: usize,
        interactions: usize,
        positions: usize,
    },
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No free chain identifier left while remapping chain '{0}'")]
    ChainIdsExhausted(char),
}

/// A molecular graph paired with its interaction terms and coordinates.
///
/// The three parts always describe the same atoms in the same order; the
/// constructor enforces this, and every operation preserves it.
#[derive(Debug, Clone)]
pub struct UnifiedStructure {
    system: MolecularSystem,
    interactions: InteractionSystem,
    positions: Positions,
}

impl UnifiedStructure {
    /// Binds a system, its interaction terms, and its coordinates together.
    ///
    /// Fails if the three parts disagree on the atom count.
    pub fn new(
        system: MolecularSystem,
        interactions: InteractionSystem,
        positions: Positions,
    ) -> Result<Self, StructureError> {
        let topology = system.atom_count();
        if topology != interactions.atom_count() || topology != positions.len() {
            return Err(StructureError::AtomCountMismatch {
                topology,
                interactions: interactions.atom_count(),
                positions: positions.len(),
            });
        }
        Ok(Self {
            system,
            interactions,
            positions,
        })
    }

    pub fn system(&self) -> &MolecularSystem {
        &self.system
    }

    pub fn interactions(&self) -> &InteractionSystem {
        &self.interactions
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn atom_count(&self) -> usize {
        self.system.atom_count()
    }

    /// Merges `other` into this structure, appending its atoms after this
    /// structure's atoms.
    ///
    /// Chain identifiers of `other` that collide with existing chains are
    /// remapped to the first free letter. Interaction-term indices of `other`
    /// are offset by this structure's atom count, and its coordinates are
    /// converted to this structure's length unit.
    pub fn merge(mut self, other: UnifiedStructure) -> Result<UnifiedStructure, MergeError> {
        let offset = self.system.atom_count();
        let UnifiedStructure {
            system: other_system,
            interactions: other_interactions,
            positions: mut other_positions,
        } = other;

        // Resolve chain identifiers up front so every atom of a remapped
        // chain lands in the same target chain.
        let mut chain_letter_map = HashMap::new();
        for (_, chain) in other_system.chains_iter() {
            let letter = self.free_chain_letter(chain.id)?;
            self.system.add_chain(letter, chain.chain_type);
            chain_letter_map.insert(chain.id, letter);
        }

        let mut atom_id_map: HashMap<AtomId, AtomId> =
            HashMap::with_capacity(other_system.atom_count());
        for &old_atom_id in other_system.atoms_ordered() {
            let atom = other_system.atom(old_atom_id).unwrap();
            let residue = other_system.residue(atom.residue_id).unwrap();
            let old_chain = other_system.chain(residue.chain_id).unwrap();
            let letter = chain_letter_map[&old_chain.id];

            let chain_id = self.system.add_chain(letter, old_chain.chain_type);
            let residue_id = self
                .system
                .add_residue(chain_id, residue.residue_number, &residue.name)
                .unwrap();

            let mut copy = Atom::new(&atom.name, residue_id, atom.position);
            copy.role = atom.role;
            copy.element = atom.element.clone();
            copy.force_field_type = atom.force_field_type.clone();
            copy.partial_charge = atom.partial_charge;
            let new_atom_id = self.system.add_atom_to_residue(residue_id, copy).unwrap();
            atom_id_map.insert(old_atom_id, new_atom_id);
        }

        for bond in other_system.bonds() {
            self.system.add_bond(
                atom_id_map[&bond.atom1_id],
                atom_id_map[&bond.atom2_id],
                bond.order,
            );
        }

        self.interactions.extend_offset(other_interactions);

        other_positions.convert_to(self.positions.unit);
        self.positions.coords.extend(other_positions.coords);

        debug!(
            atoms = self.system.atom_count(),
            appended = self.system.atom_count() - offset,
            "Merged structures"
        );
        Ok(self)
    }

    /// Returns `preferred` if free, otherwise the first unused chain letter.
    fn free_chain_letter(&self, preferred: char) -> Result<char, MergeError> {
        if self.system.find_chain_by_id(preferred).is_none() {
            return Ok(preferred);
        }
        ('A'..='Z')
            .chain('a'..='z')
            .chain('0'..='9')
            .find(|&c| self.system.find_chain_by_id(c).is_none())
            .ok_or(MergeError::ChainIdsExhausted(preferred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::interaction::NonBondedTerm;
    use crate::core::models::chain::ChainType;
    use nalgebra::point;

    fn structure_with_atoms(chain: char, chain_type: ChainType, names: &[&str]) -> UnifiedStructure {
        let mut system = MolecularSystem::new();
        let chain_id = system.add_chain(chain, chain_type);
        let residue_id = system.add_residue(chain_id, 1, "RES").unwrap();
        let mut coords = Vec::new();
        let mut interactions = InteractionSystem::default();
        for (i, name) in names.iter().enumerate() {
            let position = point![i as f64, 0.0, 0.0];
            let atom = Atom::new(name, residue_id, position);
            system.add_atom_to_residue(residue_id, atom).unwrap();
            coords.push(position);
            interactions.nonbonded.push(NonBondedTerm {
                atom: i,
                radius: 1.5,
                well_depth: 0.1,
                charge: 0.0,
            });
        }
        UnifiedStructure::new(system, interactions, Positions::new(coords, LengthUnit::Angstrom))
            .unwrap()
    }

    #[test]
    fn new_rejects_mismatched_counts() {
        let mut system = MolecularSystem::new();
        let chain_id = system.add_chain('A', ChainType::Other);
        let residue_id = system.add_residue(chain_id, 1, "RES").unwrap();
        system
            .add_atom_to_residue(residue_id, Atom::new("C1", residue_id, point![0.0, 0.0, 0.0]))
            .unwrap();

        let result = UnifiedStructure::new(
            system,
            InteractionSystem::default(),
            Positions::new(vec![point![0.0, 0.0, 0.0]], LengthUnit::Angstrom),
        );
        assert!(matches!(
            result,
            Err(StructureError::AtomCountMismatch {
                topology: 1,
                interactions: 0,
                positions: 1,
            })
        ));
    }

    #[test]
    fn merge_concatenates_left_then_right() {
        let left = structure_with_atoms('A', ChainType::Protein, &["N", "CA", "C"]);
        let right = structure_with_atoms('B', ChainType::Ligand, &["C1", "C2"]);

        let merged = left.merge(right).unwrap();
        assert_eq!(merged.atom_count(), 5);
        assert_eq!(merged.interactions().atom_count(), 5);
        assert_eq!(merged.positions().len(), 5);

        let names: Vec<_> = merged
            .system()
            .atoms_ordered()
            .iter()
            .map(|&id| merged.system().atom(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["N", "CA", "C", "C1", "C2"]);
    }

    #[test]
    fn merge_offsets_right_hand_interaction_indices() {
        let left = structure_with_atoms('A', ChainType::Protein, &["N", "CA"]);
        let right = structure_with_atoms('B', ChainType::Ligand, &["C1"]);

        let merged = left.merge(right).unwrap();
        let indices: Vec<_> = merged.interactions().nonbonded.iter().map(|t| t.atom).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn merge_remaps_colliding_chain_letter() {
        let left = structure_with_atoms('A', ChainType::Protein, &["N"]);
        let right = structure_with_atoms('A', ChainType::Ligand, &["C1"]);

        let merged = left.merge(right).unwrap();
        let chains: Vec<_> = merged.system().chains_iter().map(|(_, c)| c.id).collect();
        assert_eq!(chains, ['A', 'B']);
        assert_eq!(
            merged
                .system()
                .chain(merged.system().find_chain_by_id('B').unwrap())
                .unwrap()
                .chain_type,
            ChainType::Ligand
        );
    }

    #[test]
    fn merge_converts_units_to_left_side() {
        let left = structure_with_atoms('A', ChainType::Protein, &["N"]);
        let mut right = structure_with_atoms('B', ChainType::Ligand, &["C1", "C2"]);
        right.positions.convert_to(LengthUnit::Nanometer);

        let merged = left.merge(right).unwrap();
        assert_eq!(merged.positions().unit(), LengthUnit::Angstrom);
        // Second right-hand atom sat at x = 1 A = 0.1 nm; back in Angstroms.
        let x = merged.positions().coords()[2].x;
        assert!((x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unit_conversion_round_trips() {
        let mut positions =
            Positions::new(vec![point![2.5, 0.0, -4.0]], LengthUnit::Angstrom);
        positions.convert_to(LengthUnit::Nanometer);
        assert!((positions.coords()[0].x - 0.25).abs() < 1e-12);
        positions.convert_to(LengthUnit::Angstrom);
        assert!((positions.coords()[0].x - 2.5).abs() < 1e-12);
    }
}
