use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::AtomRole;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::chain::ChainType;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::core::utils::elements::element_from_sybyl_type;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Format-specific information carried alongside the parsed system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mol2Metadata {
    /// Molecule name from the MOLECULE record.
    pub name: String,
    /// Molecule type line (e.g., "SMALL").
    pub molecule_type: String,
    /// Charge assignment method line (e.g., "GASTEIGER", "USER_CHARGES").
    pub charge_type: String,
    /// Number of atoms declared in the MOLECULE counts line, if present.
    pub declared_atom_count: Option<usize>,
}

#[derive(Debug, Error)]
pub enum Mol2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: Mol2ParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required section: @<TRIPOS>{0}")]
    MissingSection(&'static str),
}

#[derive(Debug, Error)]
pub enum Mol2ParseErrorKind {
    #[error("Record has {found} fields, expected at least {expected}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Invalid integer in field '{field}' (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float in field '{field}' (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Unknown bond type '{0}'")]
    UnknownBondType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Molecule,
    Atom,
    Bond,
    Skipped,
}

fn parse_int(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<usize, Mol2Error> {
    value.parse().map_err(|_| Mol2Error::Parse {
        line,
        kind: Mol2ParseErrorKind::InvalidInt {
            field,
            value: value.to_string(),
        },
    })
}

fn parse_float(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<f64, Mol2Error> {
    value.parse().map_err(|_| Mol2Error::Parse {
        line,
        kind: Mol2ParseErrorKind::InvalidFloat {
            field,
            value: value.to_string(),
        },
    })
}

/// Reader/writer for the Tripos MOL2 format.
///
/// Only the MOLECULE, ATOM, and BOND record types participate in the data
/// model; other sections (SUBSTRUCTURE, SET, ...) are skipped. Atom records
/// carry SYBYL atom types and partial charges, which become the force-field
/// type and charge of the parsed atoms.
pub struct Mol2File;

impl MolecularFile for Mol2File {
    type Metadata = Mol2Metadata;
    type Error = Mol2Error;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = Mol2Metadata::default();

        let mut section = Section::None;
        let mut molecule_record_line = 0usize;
        let mut seen_atom_section = false;
        let mut atom_count = 0usize;
        let mut current_residue: Option<isize> = None;
        let mut chain_started = false;

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(section_name) = trimmed.strip_prefix("@<TRIPOS>") {
                section = match section_name.trim() {
                    "MOLECULE" => {
                        molecule_record_line = 0;
                        Section::Molecule
                    }
                    "ATOM" => {
                        seen_atom_section = true;
                        Section::Atom
                    }
                    "BOND" => Section::Bond,
                    _ => Section::Skipped,
                };
                continue;
            }

            match section {
                Section::Molecule => {
                    molecule_record_line += 1;
                    match molecule_record_line {
                        1 => metadata.name = trimmed.to_string(),
                        2 => {
                            let first = trimmed.split_whitespace().next().unwrap_or(trimmed);
                            metadata.declared_atom_count =
                                Some(parse_int(first, "num_atoms", line_num)?);
                        }
                        3 => metadata.molecule_type = trimmed.to_string(),
                        4 => metadata.charge_type = trimmed.to_string(),
                        _ => {}
                    }
                }
                Section::Atom => {
                    let fields: Vec<&str> = trimmed.split_whitespace().collect();
                    if fields.len() < 6 {
                        return Err(Mol2Error::Parse {
                            line: line_num,
                            kind: Mol2ParseErrorKind::TooFewFields {
                                expected: 6,
                                found: fields.len(),
                            },
                        });
                    }

                    let serial = parse_int(fields[0], "atom_id", line_num)?;
                    let name = fields[1];
                    let x = parse_float(fields[2], "x", line_num)?;
                    let y = parse_float(fields[3], "y", line_num)?;
                    let z = parse_float(fields[4], "z", line_num)?;
                    let sybyl_type = fields[5];

                    let subst_id: isize = match fields.get(6) {
                        Some(v) => parse_int(v, "subst_id", line_num)? as isize,
                        None => 1,
                    };
                    let subst_name = fields.get(7).copied().unwrap_or("LIG");
                    let charge = match fields.get(8) {
                        Some(v) => parse_float(v, "charge", line_num)?,
                        None => 0.0,
                    };

                    if !chain_started {
                        builder.start_chain('L', ChainType::Ligand);
                        chain_started = true;
                    }
                    if current_residue != Some(subst_id) {
                        builder.start_residue(subst_id, subst_name);
                        current_residue = Some(subst_id);
                    }

                    if builder.atom_id_for_serial(serial).is_some() {
                        return Err(Mol2Error::Inconsistency(format!(
                            "Duplicate atom id: {}",
                            serial
                        )));
                    }
                    let element = element_from_sybyl_type(sybyl_type);
                    builder.add_atom(
                        serial,
                        name,
                        &element,
                        Point3::new(x, y, z),
                        charge,
                        sybyl_type,
                    );
                    atom_count += 1;
                }
                Section::Bond => {
                    let fields: Vec<&str> = trimmed.split_whitespace().collect();
                    if fields.len() < 4 {
                        return Err(Mol2Error::Parse {
                            line: line_num,
                            kind: Mol2ParseErrorKind::TooFewFields {
                                expected: 4,
                                found: fields.len(),
                            },
                        });
                    }
                    let a1 = parse_int(fields[1], "origin_atom_id", line_num)?;
                    let a2 = parse_int(fields[2], "target_atom_id", line_num)?;
                    let order = BondOrder::from_str(fields[3]).map_err(|_| Mol2Error::Parse {
                        line: line_num,
                        kind: Mol2ParseErrorKind::UnknownBondType(fields[3].to_string()),
                    })?;
                    if !builder.add_bond(a1, a2, order) {
                        return Err(Mol2Error::Inconsistency(format!(
                            "Bond on line {} references unknown atom id ({} or {})",
                            line_num, a1, a2
                        )));
                    }
                }
                Section::None | Section::Skipped => {}
            }
        }

        if !seen_atom_section {
            return Err(Mol2Error::MissingSection("ATOM"));
        }
        if let Some(declared) = metadata.declared_atom_count {
            if declared != atom_count {
                return Err(Mol2Error::Inconsistency(format!(
                    "MOLECULE record declares {} atoms but {} were parsed",
                    declared, atom_count
                )));
            }
        }

        let mut system = builder.build();
        let atom_ids: Vec<_> = system.atoms_ordered().to_vec();
        for atom_id in atom_ids {
            let atom = system.atom_mut(atom_id).unwrap();
            atom.role = AtomRole::Ligand;
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let serials: HashMap<_, _> = system
            .atoms_ordered()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i + 1))
            .collect();

        writeln!(writer, "@<TRIPOS>MOLECULE")?;
        writeln!(
            writer,
            "{}",
            if metadata.name.is_empty() {
                "UNNAMED"
            } else {
                &metadata.name
            }
        )?;
        writeln!(
            writer,
            "{:>5} {:>5} {:>5}",
            system.atom_count(),
            system.bonds().len(),
            system.residues_iter().count()
        )?;
        writeln!(
            writer,
            "{}",
            if metadata.molecule_type.is_empty() {
                "SMALL"
            } else {
                &metadata.molecule_type
            }
        )?;
        writeln!(
            writer,
            "{}",
            if metadata.charge_type.is_empty() {
                "USER_CHARGES"
            } else {
                &metadata.charge_type
            }
        )?;

        writeln!(writer, "@<TRIPOS>ATOM")?;
        for (serial, (_, atom)) in system.atoms_iter().enumerate() {
            let residue = system
                .residue(atom.residue_id)
                .ok_or_else(|| Mol2Error::Inconsistency("Atom without parent residue".into()))?;
            writeln!(
                writer,
                "{:>7} {:<8} {:>9.4} {:>9.4} {:>9.4} {:<7} {:>3} {:<7} {:>9.4}",
                serial + 1,
                atom.name,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                atom.force_field_type,
                residue.residue_number,
                residue.name,
                atom.partial_charge,
            )?;
        }

        writeln!(writer, "@<TRIPOS>BOND")?;
        for (idx, bond) in system.bonds().iter().enumerate() {
            let a1 = serials.get(&bond.atom1_id).copied().ok_or_else(|| {
                Mol2Error::Inconsistency("Bond references atom outside system".into())
            })?;
            let a2 = serials.get(&bond.atom2_id).copied().ok_or_else(|| {
                Mol2Error::Inconsistency("Bond references atom outside system".into())
            })?;
            let code = match bond.order {
                BondOrder::Single => "1",
                BondOrder::Double => "2",
                BondOrder::Triple => "3",
                BondOrder::Aromatic => "ar",
                BondOrder::Amide => "am",
            };
            writeln!(writer, "{:>6} {:>5} {:>5} {:>4}", idx + 1, a1, a2, code)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    const BENZAMIDE_FRAGMENT: &str = "\
# Comment line
@<TRIPOS>MOLECULE
benzamide-frag
     4     3     1
SMALL
USER_CHARGES
@<TRIPOS>ATOM
      1 C1         0.0000    0.0000    0.0000 C.ar    1  BNZ      -0.0600
      2 C2         1.3900    0.0000    0.0000 C.ar    1  BNZ      -0.0600
      3 C7         2.1200    1.2100    0.0000 C.2     1  BNZ       0.5400
      4 O1         1.5200    2.2800    0.0000 O.2     1  BNZ      -0.5200
@<TRIPOS>BOND
     1     1     2 ar
     2     2     3 1
     3     3     4 2
";

    fn read(content: &str) -> Result<(MolecularSystem, Mol2Metadata), Mol2Error> {
        let mut reader = BufReader::new(content.as_bytes());
        Mol2File::read_from(&mut reader)
    }

    #[test]
    fn reads_molecule_atoms_and_bonds() {
        let (system, metadata) = read(BENZAMIDE_FRAGMENT).unwrap();

        assert_eq!(metadata.name, "benzamide-frag");
        assert_eq!(metadata.molecule_type, "SMALL");
        assert_eq!(metadata.charge_type, "USER_CHARGES");
        assert_eq!(metadata.declared_atom_count, Some(4));

        assert_eq!(system.atom_count(), 4);
        assert_eq!(system.bonds().len(), 3);
        assert_eq!(system.chains_iter().count(), 1);

        let (_, first) = system.atoms_iter().next().unwrap();
        assert_eq!(first.name, "C1");
        assert_eq!(first.force_field_type, "C.ar");
        assert_eq!(first.element, "C");
        assert_eq!(first.partial_charge, -0.06);
        assert_eq!(first.role, AtomRole::Ligand);

        let orders: Vec<BondOrder> = system.bonds().iter().map(|b| b.order).collect();
        assert_eq!(
            orders,
            vec![BondOrder::Aromatic, BondOrder::Single, BondOrder::Double]
        );
    }

    #[test]
    fn atom_order_follows_file_order() {
        let (system, _) = read(BENZAMIDE_FRAGMENT).unwrap();
        let names: Vec<String> = system
            .atoms_iter()
            .map(|(_, atom)| atom.name.clone())
            .collect();
        assert_eq!(names, vec!["C1", "C2", "C7", "O1"]);
    }

    #[test]
    fn declared_atom_count_mismatch_is_fatal() {
        let content = BENZAMIDE_FRAGMENT.replacen("     4     3", "     5     3", 1);
        let result = read(&content);
        assert!(matches!(result, Err(Mol2Error::Inconsistency(_))));
    }

    #[test]
    fn missing_atom_section_is_fatal() {
        let result = read("@<TRIPOS>MOLECULE\nempty\n 0 0\nSMALL\nNO_CHARGES\n");
        assert!(matches!(result, Err(Mol2Error::MissingSection("ATOM"))));
    }

    #[test]
    fn malformed_coordinate_reports_line_number() {
        let content = BENZAMIDE_FRAGMENT.replace("1.3900", "not-a-number");
        let err = read(&content).unwrap_err();
        match err {
            Mol2Error::Parse { line, kind } => {
                assert_eq!(line, 9);
                assert!(matches!(
                    kind,
                    Mol2ParseErrorKind::InvalidFloat { field: "x", .. }
                ));
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn bond_to_unknown_atom_is_fatal() {
        let content = BENZAMIDE_FRAGMENT.replace("     3     3     4 2", "     3     3     9 2");
        let result = read(&content);
        assert!(matches!(result, Err(Mol2Error::Inconsistency(_))));
    }

    #[test]
    fn unknown_bond_type_is_fatal() {
        let content = BENZAMIDE_FRAGMENT.replace("     2     2     3 1", "     2     2     3 q");
        let result = read(&content);
        assert!(matches!(
            result,
            Err(Mol2Error::Parse {
                kind: Mol2ParseErrorKind::UnknownBondType(_),
                ..
            })
        ));
    }

    #[test]
    fn written_output_parses_back_identically() {
        let (system, metadata) = read(BENZAMIDE_FRAGMENT).unwrap();
        let mut buffer = Vec::new();
        Mol2File::write_to(&system, &metadata, &mut buffer).unwrap();

        let (reread, remeta) = read(std::str::from_utf8(&buffer).unwrap()).unwrap();
        assert_eq!(reread.atom_count(), system.atom_count());
        assert_eq!(reread.bonds().len(), system.bonds().len());
        assert_eq!(remeta.name, metadata.name);
        let names: Vec<_> = reread.atoms_iter().map(|(_, a)| a.name.clone()).collect();
        assert_eq!(names, vec!["C1", "C2", "C7", "O1"]);
    }
}
