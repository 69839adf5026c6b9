use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "promix - assemble combined protein-ligand simulation systems from structure and parameter files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a combined protein-ligand simulation system.
    Assemble(AssembleArgs),
}

/// Arguments for the `assemble` subcommand.
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Path to the ligand structure file (Tripos MOL2).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Path to the protein structure file (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub protein: PathBuf,

    /// Path to the force-field parameter file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub forcefield: PathBuf,

    /// Path to the residue template registry in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub templates: PathBuf,

    /// Bond constraint scheme: none, h-bonds, or all-bonds.
    #[arg(short, long, value_name = "SPEC", default_value = "none")]
    pub constraints: String,

    /// Replace water internal terms with rigid constraints.
    #[arg(long)]
    pub rigid_water: bool,

    /// Write the merged structure to this path as PDB.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
