use super::atom::Atom;
use super::chain::ChainType;
use super::ids::{AtomId, ChainId, ResidueId};
use super::system::MolecularSystem;
use super::topology::BondOrder;
use nalgebra::Point3;
use std::collections::HashMap;

/// Incrementally constructs a [`MolecularSystem`] from file records.
///
/// File formats identify atoms by serial numbers and arrive as a linear
/// stream of chain/residue/atom/bond records; the builder tracks the current
/// chain and residue and maps serials to stable atom IDs so that bond records
/// can be resolved after the atom block.
pub struct MolecularSystemBuilder {
    system: MolecularSystem,
    atom_serial_map: HashMap<usize, AtomId>,
    current_chain: Option<ChainId>,
    current_residue: Option<ResidueId>,
}

impl Default for MolecularSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self {
            system: MolecularSystem::new(),
            atom_serial_map: HashMap::new(),
            current_chain: None,
            current_residue: None,
        }
    }

    /// Starts (or resumes) a chain; subsequent residues are added to it.
    pub fn start_chain(&mut self, id: char, chain_type: ChainType) -> &mut Self {
        let chain_id = self.system.add_chain(id, chain_type);
        self.current_chain = Some(chain_id);
        self.current_residue = None;
        self
    }

    /// Starts (or resumes) a residue within the current chain.
    ///
    /// Returns `false` if no chain has been started.
    pub fn start_residue(&mut self, residue_number: isize, name: &str) -> bool {
        let Some(chain_id) = self.current_chain else {
            return false;
        };
        self.current_residue = self.system.add_residue(chain_id, residue_number, name);
        self.current_residue.is_some()
    }

    /// Adds an atom to the current residue, keyed by its file serial number.
    ///
    /// Returns `false` if no residue has been started.
    #[allow(clippy::too_many_arguments)]
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
        charge: f64,
        ff_type: &str,
    ) -> bool {
        let Some(residue_id) = self.current_residue else {
            return false;
        };

        let mut atom = Atom::new(name, residue_id, position);
        atom.element = element.to_string();
        atom.partial_charge = charge;
        atom.force_field_type = ff_type.to_string();

        match self.system.add_atom_to_residue(residue_id, atom) {
            Some(atom_id) => {
                self.atom_serial_map.insert(serial, atom_id);
                true
            }
            None => false,
        }
    }

    /// Adds a bond between two atoms identified by serial numbers.
    ///
    /// Serials come from untrusted files, so an unknown endpoint is reported
    /// to the caller rather than panicking.
    pub fn add_bond(&mut self, serial1: usize, serial2: usize, order: BondOrder) -> bool {
        let (Some(&id1), Some(&id2)) = (
            self.atom_serial_map.get(&serial1),
            self.atom_serial_map.get(&serial2),
        ) else {
            return false;
        };
        self.system.add_bond(id1, id2, order).is_some()
    }

    /// Returns the atom ID previously registered for a serial number.
    pub fn atom_id_for_serial(&self, serial: usize) -> Option<AtomId> {
        self.atom_serial_map.get(&serial).copied()
    }

    /// Finishes construction and returns the system.
    pub fn build(self) -> MolecularSystem {
        self.system
    }
}
