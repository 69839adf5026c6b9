use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents the role or classification of an atom within a molecular complex.
///
/// Roles distinguish the components of a merged protein-ligand system so that
/// later stages (constraint generation, reporting) can treat them differently
/// without re-deriving the classification from residue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Atom belonging to a protein chain.
    Protein,
    /// Atom belonging to a small-molecule ligand.
    Ligand,
    /// Atom of a solvent water molecule.
    Water,
    /// Unknown or unclassified atom role.
    #[default]
    Other,
}

/// Represents an atom in a molecular structure.
///
/// This struct carries everything the assembly pipeline needs to know about an
/// atom: its identity within the structure hierarchy, its element, the
/// force-field atom type used for parameter lookup, its partial charge, and
/// its 3D coordinates in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N1", "O").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The role of the atom in the molecular complex.
    pub role: AtomRole,
    /// The chemical element symbol (e.g., "C", "N", "Cl").
    pub element: String,
    /// The force field atom type (e.g., "C.3", "N.ar").
    pub force_field_type: String,
    /// The partial atomic charge in elementary charge units.
    pub partial_charge: f64,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with default values for most fields.
    ///
    /// The element, force-field type, and partial charge start empty/zero and
    /// are filled in by the parsers and the parameterization stage.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            position,
            role: AtomRole::default(),
            element: String::new(),
            force_field_type: String::new(),
            partial_charge: 0.0,
        }
    }

    /// Returns true if this atom is a hydrogen.
    pub fn is_hydrogen(&self) -> bool {
        self.element == "H"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.role, AtomRole::Other);
        assert_eq!(atom.element, "");
        assert_eq!(atom.force_field_type, "");
        assert_eq!(atom.partial_charge, 0.0);
    }

    #[test]
    fn is_hydrogen_checks_element_symbol() {
        let residue_id = ResidueId::default();
        let mut atom = Atom::new("H1", residue_id, Point3::origin());
        assert!(!atom.is_hydrogen());
        atom.element = "H".to_string();
        assert!(atom.is_hydrogen());
        atom.element = "He".to_string();
        assert!(!atom.is_hydrogen());
    }
}
