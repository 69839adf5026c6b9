//! The interaction-system description produced by parameterization.
//!
//! All terms reference atoms by their index in the owning structure's
//! canonical atom order, which keeps the description stable across the merge
//! operation (merging only requires offsetting the right-hand side).

/// Per-atom nonbonded parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonBondedTerm {
    /// Index of the atom in the canonical atom order.
    pub atom: usize,
    /// Van der Waals radius in Angstroms.
    pub radius: f64,
    /// Well depth (epsilon) in kcal/mol.
    pub well_depth: f64,
    /// Partial charge in elementary charge units.
    pub charge: f64,
}

/// A harmonic bond term between two atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub atoms: [usize; 2],
    pub force_constant: f64,
    pub equilibrium_length: f64,
}

/// A harmonic angle term over three atoms (the middle atom is the vertex).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub atoms: [usize; 3],
    pub force_constant: f64,
    /// Equilibrium angle in degrees.
    pub equilibrium_angle: f64,
}

/// A proper torsion term over four atoms around the central bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionTerm {
    pub atoms: [usize; 4],
    pub barrier: f64,
    pub periodicity: i32,
    /// Phase offset in degrees.
    pub phase: f64,
}

/// Force-field term assignments for one structure.
///
/// Created by the [`parameterization`](super::parameterization) stage,
/// consumed by structure merging and system assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionSystem {
    pub nonbonded: Vec<NonBondedTerm>,
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub torsions: Vec<TorsionTerm>,
}

impl InteractionSystem {
    /// Number of atoms covered by the nonbonded terms.
    ///
    /// Parameterization emits exactly one nonbonded term per atom, so this
    /// equals the atom count of the structure the terms were generated for.
    pub fn atom_count(&self) -> usize {
        self.nonbonded.len()
    }

    /// Shifts every atom index by `offset`.
    fn shift(&mut self, offset: usize) {
        for term in &mut self.nonbonded {
            term.atom += offset;
        }
        for term in &mut self.bonds {
            term.atoms = term.atoms.map(|a| a + offset);
        }
        for term in &mut self.angles {
            term.atoms = term.atoms.map(|a| a + offset);
        }
        for term in &mut self.torsions {
            term.atoms = term.atoms.map(|a| a + offset);
        }
    }

    /// Appends another interaction system whose atoms follow this one's in
    /// the combined atom order.
    pub fn extend_offset(&mut self, mut other: InteractionSystem) {
        other.shift(self.atom_count());
        self.nonbonded.append(&mut other.nonbonded);
        self.bonds.append(&mut other.bonds);
        self.angles.append(&mut other.angles);
        self.torsions.append(&mut other.torsions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> InteractionSystem {
        InteractionSystem {
            nonbonded: (0..n)
                .map(|i| NonBondedTerm {
                    atom: i,
                    radius: 1.0,
                    well_depth: 0.1,
                    charge: 0.0,
                })
                .collect(),
            bonds: if n >= 2 {
                vec![BondTerm {
                    atoms: [0, 1],
                    force_constant: 300.0,
                    equilibrium_length: 1.5,
                }]
            } else {
                Vec::new()
            },
            angles: Vec::new(),
            torsions: Vec::new(),
        }
    }

    #[test]
    fn atom_count_tracks_nonbonded_terms() {
        assert_eq!(sample(3).atom_count(), 3);
        assert_eq!(InteractionSystem::default().atom_count(), 0);
    }

    #[test]
    fn extend_offset_shifts_appended_indices() {
        let mut left = sample(3);
        let right = sample(2);
        left.extend_offset(right);

        assert_eq!(left.atom_count(), 5);
        assert_eq!(left.nonbonded[3].atom, 3);
        assert_eq!(left.nonbonded[4].atom, 4);
        assert_eq!(left.bonds.len(), 2);
        assert_eq!(left.bonds[0].atoms, [0, 1]);
        assert_eq!(left.bonds[1].atoms, [3, 4]);
    }

    #[test]
    fn extend_offset_keeps_left_side_untouched() {
        let mut left = sample(2);
        let original = left.clone();
        left.extend_offset(InteractionSystem::default());
        assert_eq!(left, original);
    }
}
