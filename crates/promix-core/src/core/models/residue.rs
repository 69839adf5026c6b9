use super::ids::{AtomId, ChainId};
use std::collections::HashMap;

/// Coarse classification of a residue by what it represents chemically.
///
/// Derived from the residue name at parse time; used to pick chain types and
/// to identify solvent molecules for rigid-water constraint generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueKind {
    /// One of the twenty standard amino acids (including common His variants).
    AminoAcid,
    /// A solvent water molecule (HOH, WAT, TIP3, SPC).
    Water,
    /// Anything else: ligands, ions, cofactors, modified residues.
    Other,
}

const AMINO_ACID_NAMES: [&str; 23] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "HSE", "HSD", "ILE", "LEU",
    "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", "CYX",
];

const WATER_NAMES: [&str; 4] = ["HOH", "WAT", "TIP3", "SPC"];

impl ResidueKind {
    /// Classifies a residue by its three-letter (or longer) name.
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        if AMINO_ACID_NAMES.contains(&upper.as_str()) {
            ResidueKind::AminoAcid
        } else if WATER_NAMES.contains(&upper.as_str()) {
            ResidueKind::Water
        } else {
            ResidueKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Residue sequence number from the source file.
    pub residue_number: isize,
    /// Name of the residue (e.g., "ALA", "HOH", "LIG").
    pub name: String,
    /// Classification derived from the residue name.
    pub kind: ResidueKind,
    /// ID of the parent chain.
    pub chain_id: ChainId,
    pub(crate) atoms: Vec<AtomId>,
    atom_name_map: HashMap<String, Vec<AtomId>>,
}

impl Residue {
    pub(crate) fn new(residue_number: isize, name: &str, chain_id: ChainId) -> Self {
        Self {
            residue_number,
            name: name.to_string(),
            kind: ResidueKind::from_name(name),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_default()
            .push(atom_id);
    }

    /// Atom IDs in this residue, in insertion order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Looks up the first atom with the given name, if any.
    ///
    /// Names are not guaranteed unique within a residue (some het groups reuse
    /// them), so this returns the first occurrence in file order.
    pub fn get_first_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map
            .get(name)
            .and_then(|ids| ids.first())
            .copied()
    }
}
