use crate::cli::AssembleArgs;
use crate::error::{CliError, Result};
use promix::assembly::config::{AssemblyConfigBuilder, ConstraintSpec};
use promix::core::io::pdb::{PdbFile, PdbMetadata};
use promix::core::io::traits::MolecularFile;
use promix::workflows;
use tracing::info;

pub fn run(args: AssembleArgs) -> Result<()> {
    let constraints: ConstraintSpec = args
        .constraints
        .parse()
        .map_err(|e| CliError::Argument(format!("{}", e)))?;

    let config = AssemblyConfigBuilder::new()
        .ligand_path(args.ligand)
        .protein_path(args.protein)
        .forcefield_path(args.forcefield)
        .templates_path(args.templates)
        .constraints(constraints)
        .rigid_water(args.rigid_water)
        .build()
        .map_err(promix::assembly::error::AssemblyError::from)?;

    println!("Assembling simulation system...");
    let result = workflows::assemble::run(&config)?;

    println!("Assembly complete.");
    println!("  Particles:   {}", result.system.particle_count());
    println!("  Bonds:       {}", result.system.bonds.len());
    println!("  Angles:      {}", result.system.angles.len());
    println!("  Torsions:    {}", result.system.torsions.len());
    println!("  Constraints: {}", result.system.constraints.len());

    if let Some(output) = args.output {
        info!("Writing merged structure to {:?}", &output);
        let metadata = PdbMetadata::default();
        PdbFile::write_to_path(result.structure.system(), &metadata, &output)
            .map_err(promix::assembly::error::AssemblyError::from)?;
        println!("Merged structure written to: {}", output.display());
    }

    Ok(())
}
