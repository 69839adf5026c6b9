use crate::assembly::config::AssemblyConfig;
use crate::assembly::error::AssemblyError;
use crate::assembly::structure::{LengthUnit, Positions, UnifiedStructure};
use crate::assembly::system::SimulationSystem;
use crate::core::forcefield::parameterization::Parameterizer;
use crate::core::forcefield::params::Forcefield;
use crate::core::io::mol2::Mol2File;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::AtomRole;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::registry::TemplateRegistry;
use tracing::{info, instrument};

/// Output of one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    /// The merged protein plus ligand structure.
    pub structure: UnifiedStructure,
    /// The simulation-ready system derived from it.
    pub system: SimulationSystem,
}

/// Runs the full assembly pipeline: ligand, protein, merge, system.
///
/// The pipeline is a single forward pass; the first failing stage aborts the
/// run. The force field is loaded before any structure work so a bad
/// parameter path fails immediately.
#[instrument(skip_all, name = "assembly_workflow")]
pub fn run(config: &AssemblyConfig) -> Result<AssemblyResult, AssemblyError> {
    info!("Loading force field parameters.");
    let forcefield = Forcefield::load(&config.forcefield_path)?;
    let parameterizer = Parameterizer::new(&forcefield);

    info!(path = %config.ligand_path.display(), "Reading ligand structure.");
    let (ligand_system, ligand_metadata) = Mol2File::read_from_path(&config.ligand_path)?;
    if !has_meaningful_coordinates(&ligand_system) {
        return Err(AssemblyError::LigandMissingCoordinates(
            ligand_metadata.name.clone(),
        ));
    }
    let ligand_interactions = parameterizer.parameterize(&ligand_system)?;
    let ligand_positions = collect_positions(&ligand_system);
    let ligand = UnifiedStructure::new(ligand_system, ligand_interactions, ligand_positions)?;
    info!(atoms = ligand.atom_count(), "Ligand parameterized.");

    info!(path = %config.protein_path.display(), "Reading protein structure.");
    let (mut protein_system, _) = PdbFile::read_from_path(&config.protein_path)?;
    let registry = TemplateRegistry::load(&config.templates_path)?;
    registry.apply(&mut protein_system)?;
    let protein_interactions = parameterizer.parameterize(&protein_system)?;
    let protein_positions = collect_positions(&protein_system);
    let protein = UnifiedStructure::new(protein_system, protein_interactions, protein_positions)?;
    info!(atoms = protein.atom_count(), "Protein parameterized.");

    // Protein atoms come first in the combined ordering.
    let structure = protein.merge(ligand)?;
    info!(
        atoms = structure.atom_count(),
        protein_atoms = structure.system().atoms_by_role(AtomRole::Protein).count(),
        ligand_atoms = structure.system().atoms_by_role(AtomRole::Ligand).count(),
        "Structures merged."
    );

    let system = structure.create_system(&config.options)?;
    info!(
        particles = system.particle_count(),
        constraints = system.constraints.len(),
        "Simulation system assembled."
    );

    Ok(AssemblyResult { structure, system })
}

/// Extracts the coordinate array in canonical atom order.
fn collect_positions(system: &MolecularSystem) -> Positions {
    let coords = system
        .atoms_ordered()
        .iter()
        .filter_map(|&id| system.atom(id))
        .map(|atom| atom.position)
        .collect();
    Positions::new(coords, LengthUnit::Angstrom)
}

/// A structure file with every atom at the origin carries no usable
/// conformer.
fn has_meaningful_coordinates(system: &MolecularSystem) -> bool {
    system
        .atoms_iter()
        .any(|(_, atom)| atom.position.coords.norm_squared() > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::config::{AssemblyConfigBuilder, ConstraintSpec};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    const LIGAND_MOL2: &str = "\
@<TRIPOS>MOLECULE
ethanol-fragment
3 2 1
SMALL
USER_CHARGES
@<TRIPOS>ATOM
1 C1 0.000 0.000 0.000 C.3 1 LIG 0.030
2 O1 1.430 0.000 0.000 O.3 1 LIG -0.600
3 H1 1.750 0.890 0.100 H 1 LIG 0.420
@<TRIPOS>BOND
1 1 2 1
2 2 3 1
";

    const FLAT_LIGAND_MOL2: &str = "\
@<TRIPOS>MOLECULE
flat
2 1 1
SMALL
USER_CHARGES
@<TRIPOS>ATOM
1 C1 0.000 0.000 0.000 C.3 1 LIG 0.000
2 O1 0.000 0.000 0.000 O.3 1 LIG 0.000
@<TRIPOS>BOND
1 1 2 1
";

    const PROTEIN_PDB: &str = "\
ATOM      1  N   GLY A   1      -0.500   0.800   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       0.900   0.900   0.100  1.00  0.00           C
ATOM      3  C   GLY A   1       1.600  -0.400   0.000  1.00  0.00           C
ATOM      4  O   GLY A   1       1.000  -1.450   0.100  1.00  0.00           O
END
";

    const TEMPLATES: &str = r#"
[GLY]
atoms = [
    { name = "N", type = "N.4", charge = -0.3 },
    { name = "CA", type = "C.3", charge = 0.1 },
    { name = "C", type = "C.2", charge = 0.6 },
    { name = "O", type = "O.2", charge = -0.6 },
]
bonds = [["N", "CA"], ["CA", "C"], ["C", "O"]]
link_in = "N"
link_out = "C"
"#;

    // Covers every type pair the two fixtures produce, with wildcard
    // angles and torsions to keep the table small.
    const FORCEFIELD: &str = r#"
[globals]
dielectric_constant = 1.0
coulomb_scale_14 = 0.8333
vdw_scale_14 = 0.5

[vdw."C.3"]
radius = 1.9080
well_depth = 0.1094

[vdw."C.2"]
radius = 1.9080
well_depth = 0.0860

[vdw."O.3"]
radius = 1.7210
well_depth = 0.2104

[vdw."O.2"]
radius = 1.6612
well_depth = 0.2100

[vdw."N.4"]
radius = 1.8240
well_depth = 0.1700

[vdw.H]
radius = 0.6000
well_depth = 0.0157

[bond."C.3:O.3"]
force_constant = 320.0
equilibrium_length = 1.410

[bond."O.3:H"]
force_constant = 553.0
equilibrium_length = 0.960

[bond."N.4:C.3"]
force_constant = 367.0
equilibrium_length = 1.471

[bond."C.3:C.2"]
force_constant = 317.0
equilibrium_length = 1.522

[bond."C.2:O.2"]
force_constant = 570.0
equilibrium_length = 1.229

[angle."X:C.3:X"]
force_constant = 63.0
equilibrium_angle = 109.5

[angle."X:O.3:X"]
force_constant = 47.0
equilibrium_angle = 108.5

[angle."X:C.2:X"]
force_constant = 80.0
equilibrium_angle = 120.0

[torsion."X:C.3:O.3:X"]
barrier = 0.16
periodicity = 3
phase = 0.0

[torsion."X:C.3:C.2:X"]
barrier = 0.0
periodicity = 2
phase = 0.0

[torsion."X:N.4:C.3:X"]
barrier = 0.156
periodicity = 3
phase = 0.0
"#;

    struct Fixture {
        _dir: TempDir,
        ligand: PathBuf,
        protein: PathBuf,
        forcefield: PathBuf,
        templates: PathBuf,
    }

    fn write_fixture(ligand_mol2: &str) -> Fixture {
        let dir = tempdir().unwrap();
        let write = |name: &str, content: &str| -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        };
        Fixture {
            ligand: write("ligand.mol2", ligand_mol2),
            protein: write("protein.pdb", PROTEIN_PDB),
            forcefield: write("ff.toml", FORCEFIELD),
            templates: write("templates.toml", TEMPLATES),
            _dir: dir,
        }
    }

    fn config_for(fixture: &Fixture) -> AssemblyConfig {
        AssemblyConfigBuilder::new()
            .ligand_path(fixture.ligand.clone())
            .protein_path(fixture.protein.clone())
            .forcefield_path(fixture.forcefield.clone())
            .templates_path(fixture.templates.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn pipeline_merges_protein_before_ligand() {
        let fixture = write_fixture(LIGAND_MOL2);
        let result = run(&config_for(&fixture)).unwrap();

        // 4 protein atoms followed by 3 ligand atoms.
        assert_eq!(result.structure.atom_count(), 7);
        assert_eq!(result.system.particle_count(), 7);

        let system = result.structure.system();
        let names: Vec<_> = system
            .atoms_ordered()
            .iter()
            .map(|&id| system.atom(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["N", "CA", "C", "O", "C1", "O1", "H1"]);
        assert_eq!(system.atoms_by_role(AtomRole::Protein).count(), 4);
        assert_eq!(system.atoms_by_role(AtomRole::Ligand).count(), 3);
    }

    #[test]
    fn default_assembly_preserves_all_bond_terms() {
        let fixture = write_fixture(LIGAND_MOL2);
        let result = run(&config_for(&fixture)).unwrap();

        // 3 protein bonds plus 2 ligand bonds, no constraints.
        assert_eq!(result.system.bonds.len(), 5);
        assert!(result.system.constraints.is_empty());
        assert_eq!(result.system.nonbonded.len(), 7);
    }

    #[test]
    fn hydrogen_constraints_apply_to_ligand_hydroxyl() {
        let fixture = write_fixture(LIGAND_MOL2);
        let config = AssemblyConfigBuilder::new()
            .ligand_path(fixture.ligand.clone())
            .protein_path(fixture.protein.clone())
            .forcefield_path(fixture.forcefield.clone())
            .templates_path(fixture.templates.clone())
            .constraints(ConstraintSpec::HydrogenBonds)
            .build()
            .unwrap();
        let result = run(&config).unwrap();

        // Only the O1-H1 ligand bond has a hydrogen end.
        assert_eq!(result.system.constraints.len(), 1);
        assert_eq!(result.system.bonds.len(), 4);
        assert!((result.system.constraints[0].distance - 0.960).abs() < 1e-9);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let fixture = write_fixture(LIGAND_MOL2);
        let config = config_for(&fixture);
        let first = run(&config).unwrap();
        let second = run(&config).unwrap();

        assert_eq!(first.system, second.system);
        assert_eq!(
            first.structure.positions().coords(),
            second.structure.positions().coords()
        );
    }

    #[test]
    fn missing_forcefield_fails_before_any_structure_work() {
        let fixture = write_fixture(LIGAND_MOL2);
        let config = AssemblyConfigBuilder::new()
            .ligand_path(fixture.ligand.clone())
            .protein_path(fixture.protein.clone())
            .forcefield_path(Path::new("/nonexistent/ff.toml").to_path_buf())
            .templates_path(fixture.templates.clone())
            .build()
            .unwrap();

        assert!(matches!(run(&config), Err(AssemblyError::Forcefield(_))));
    }

    #[test]
    fn all_zero_ligand_coordinates_are_rejected() {
        let fixture = write_fixture(FLAT_LIGAND_MOL2);
        let result = run(&config_for(&fixture));
        assert!(matches!(
            result,
            Err(AssemblyError::LigandMissingCoordinates(name)) if name == "flat"
        ));
    }
}
