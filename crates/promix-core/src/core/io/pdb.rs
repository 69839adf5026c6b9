use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::AtomRole;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::chain::ChainType;
use crate::core::models::residue::ResidueKind;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::core::utils::elements::{element_from_pdb_name, normalize_symbol};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Header records preserved from a PDB file.
///
/// The structural records become the molecular system; everything else
/// (HEADER, TITLE, REMARK, ...) is carried verbatim so it can be written back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("No ATOM or HETATM records found")]
    Empty,
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM/HETATM record (need coordinates up to column 54)")]
    LineTooShort,
    #[error("Could not determine the element for atom '{atom_name}'")]
    UnknownElement { atom_name: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// Reader/writer for the PDB format (fixed-column ATOM/HETATM records).
///
/// Only the first model of a multi-model file is read. Alternate locations
/// other than blank or 'A' are skipped. CONECT records become bonds; protein
/// connectivity is normally reconstructed later from residue templates.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut seen_serials = HashSet::new();
        let mut conect_pairs: Vec<(usize, usize)> = Vec::new();

        let mut current_chain = '\0';
        let mut current_residue = isize::MIN;
        let mut atom_count = 0usize;

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let altloc = slice_and_trim(&line, 16, 17);
                    if !(altloc.is_empty() || altloc == "A") {
                        continue;
                    }

                    let serial = parse_int(&line, line_num, 6, 11)? as usize;
                    if !seen_serials.insert(serial) {
                        return Err(PdbError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            serial
                        )));
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = slice_and_trim(&line, 21, 22).chars().next().unwrap_or('A');
                    let res_seq = parse_int(&line, line_num, 22, 26)?;
                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;

                    let element_field = slice_and_trim(&line, 76, 78);
                    let element = if element_field.is_empty() {
                        element_from_pdb_name(name).ok_or_else(|| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::UnknownElement {
                                atom_name: name.to_string(),
                            },
                        })?
                    } else {
                        normalize_symbol(element_field)
                    };

                    if chain_id != current_chain {
                        let chain_type = if record_type == "ATOM" {
                            ChainType::Protein
                        } else if ResidueKind::from_name(res_name) == ResidueKind::Water {
                            ChainType::Water
                        } else {
                            ChainType::Other
                        };
                        builder.start_chain(chain_id, chain_type);
                        current_chain = chain_id;
                        current_residue = isize::MIN;
                    }
                    if res_seq != current_residue {
                        builder.start_residue(res_seq, res_name);
                        current_residue = res_seq;
                    }

                    builder.add_atom(serial, name, &element, Point3::new(x, y, z), 0.0, "");
                    atom_count += 1;
                }
                "CONECT" => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() < 3 {
                        continue;
                    }
                    if let Ok(origin) = parts[1].parse::<usize>() {
                        for bonded in &parts[2..] {
                            if let Ok(target) = bonded.parse::<usize>() {
                                conect_pairs.push((origin.min(target), origin.max(target)));
                            }
                        }
                    }
                }
                "TER" => {
                    current_residue = isize::MIN;
                }
                "END" | "ENDMDL" => break,
                "" => {}
                _ => metadata.header_lines.push(line.clone()),
            }
        }

        if atom_count == 0 {
            return Err(PdbError::Empty);
        }

        conect_pairs.sort_unstable();
        conect_pairs.dedup();
        for (a1, a2) in conect_pairs {
            // CONECT may reference atoms filtered out with their altloc;
            // those references are dropped rather than treated as errors.
            builder.add_bond(a1, a2, BondOrder::Single);
        }

        let mut system = builder.build();
        let roles: Vec<(crate::core::models::ids::AtomId, AtomRole)> = system
            .atoms_iter()
            .map(|(id, atom)| {
                let residue = system.residue(atom.residue_id).unwrap();
                let chain = system.chain(residue.chain_id).unwrap();
                let role = match (residue.kind, chain.chain_type) {
                    (ResidueKind::Water, _) => AtomRole::Water,
                    (_, ChainType::Protein) => AtomRole::Protein,
                    (_, ChainType::Ligand) => AtomRole::Ligand,
                    _ => AtomRole::Other,
                };
                (id, role)
            })
            .collect();
        for (id, role) in roles {
            system.atom_mut(id).unwrap().role = role;
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        // Serials are assigned in write order; TER records consume one too,
        // matching PDB numbering conventions.
        let mut serials: HashMap<_, usize> = HashMap::with_capacity(system.atom_count());
        let mut next_serial = 1usize;

        for (_, chain) in system.chains_iter() {
            let mut last_serial = 0usize;
            let mut last_res = None;
            for &residue_id in chain.residues() {
                let residue = system.residue(residue_id).ok_or_else(|| {
                    PdbError::Inconsistency("Chain references missing residue".into())
                })?;
                for &atom_id in residue.atoms() {
                    let atom = system.atom(atom_id).ok_or_else(|| {
                        PdbError::Inconsistency("Residue references missing atom".into())
                    })?;
                    let record = if atom.role == AtomRole::Protein {
                        "ATOM  "
                    } else {
                        "HETATM"
                    };
                    // Single-letter elements are indented one column in the
                    // PDB atom-name field.
                    let name = if atom.name.len() < 4 && atom.element.len() == 1 {
                        format!(" {:<3}", atom.name)
                    } else {
                        format!("{:<4}", atom.name)
                    };
                    last_serial = next_serial;
                    next_serial += 1;
                    serials.insert(atom_id, last_serial);
                    last_res = Some(residue);
                    writeln!(
                        writer,
                        "{}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        record,
                        last_serial,
                        name,
                        " ", // altLoc
                        residue.name,
                        chain.id,
                        residue.residue_number,
                        " ", // iCode
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        1.0,
                        0.0,
                        atom.element,
                    )?;
                }
            }
            if chain.chain_type == ChainType::Protein {
                if let Some(residue) = last_res {
                    writeln!(
                        writer,
                        "TER   {:>5}      {:>3} {}{:>4}",
                        next_serial,
                        residue.name,
                        chain.id,
                        residue.residue_number
                    )?;
                    next_serial += 1;
                }
            }
        }

        // Explicit connectivity is only written for het-group bonds; protein
        // connectivity is implied by residue identity.
        let mut conect: Vec<(usize, usize)> = Vec::new();
        for bond in system.bonds() {
            let a1 = system.atom(bond.atom1_id);
            let a2 = system.atom(bond.atom2_id);
            if let (Some(a1), Some(a2)) = (a1, a2) {
                if a1.role != AtomRole::Protein || a2.role != AtomRole::Protein {
                    let s1 = serials[&bond.atom1_id];
                    let s2 = serials[&bond.atom2_id];
                    conect.push((s1.min(s2), s1.max(s2)));
                }
            }
        }
        conect.sort_unstable();
        for (s1, s2) in conect {
            writeln!(writer, "CONECT{:>5}{:>5}", s1, s2)?;
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    const DIPEPTIDE_WITH_LIGAND: &str = "\
HEADER    TEST STRUCTURE
TITLE     GLY-ALA WITH A CHLORIDE-BEARING FRAGMENT
ATOM      1  N   GLY A   1      -0.500   0.800   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       0.900   0.900   0.100  1.00  0.00           C
ATOM      3  C   GLY A   1       1.600  -0.400   0.000  1.00  0.00           C
ATOM      4  O   GLY A   1       1.000  -1.450   0.100  1.00  0.00           O
ATOM      5  N   ALA A   2       2.900  -0.350  -0.100  1.00  0.00           N
ATOM      6  CA  ALA A   2       3.700  -1.550  -0.100  1.00  0.00           C
ATOM      7  CB  ALA A   2       5.150  -1.200  -0.300  1.00  0.00           C
ATOM      8  C   ALA A   2       3.250  -2.500  -1.200  1.00  0.00           C
ATOM      9  O   ALA A   2       2.750  -2.050  -2.250  1.00  0.00           O
TER      10      ALA A   2
HETATM   11 CL1  FRG B 101      10.000  10.000  10.000  1.00  0.00          CL
HETATM   12  C1  FRG B 101      11.700  10.100  10.000  1.00  0.00           C
HETATM   13  O   HOH C 201       8.000   2.000   3.000  1.00  0.00           O
CONECT   11   12
END
";

    fn read(content: &str) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        let mut reader = BufReader::new(content.as_bytes());
        PdbFile::read_from(&mut reader)
    }

    #[test]
    fn reads_chains_residues_and_atoms() {
        let (system, metadata) = read(DIPEPTIDE_WITH_LIGAND).unwrap();

        assert_eq!(system.atom_count(), 12);
        assert_eq!(system.chains_iter().count(), 3);
        assert_eq!(metadata.header_lines.len(), 2);

        let chain_a = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.chain(chain_a).unwrap().chain_type, ChainType::Protein);
        assert_eq!(system.chain(chain_a).unwrap().residues().len(), 2);

        let chain_b = system.find_chain_by_id('B').unwrap();
        assert_eq!(system.chain(chain_b).unwrap().chain_type, ChainType::Other);

        let chain_c = system.find_chain_by_id('C').unwrap();
        assert_eq!(system.chain(chain_c).unwrap().chain_type, ChainType::Water);
    }

    #[test]
    fn element_parsing_and_roles() {
        let (system, _) = read(DIPEPTIDE_WITH_LIGAND).unwrap();

        let elements: Vec<String> = system
            .atoms_iter()
            .map(|(_, atom)| atom.element.clone())
            .collect();
        assert_eq!(elements[0], "N");
        // CL1 is the first het atom, right after the 9 protein atoms.
        assert_eq!(elements[9], "Cl");

        let roles: Vec<AtomRole> = system.atoms_iter().map(|(_, atom)| atom.role).collect();
        assert_eq!(roles[0], AtomRole::Protein);
        assert_eq!(roles[9], AtomRole::Other);
        assert_eq!(roles[11], AtomRole::Water);
    }

    #[test]
    fn conect_records_become_bonds() {
        let (system, _) = read(DIPEPTIDE_WITH_LIGAND).unwrap();
        assert_eq!(system.bonds().len(), 1);
        let bond = &system.bonds()[0];
        assert_eq!(system.atom(bond.atom1_id).unwrap().name, "CL1");
        assert_eq!(system.atom(bond.atom2_id).unwrap().name, "C1");
    }

    #[test]
    fn atom_count_matches_declared_records() {
        let (system, _) = read(DIPEPTIDE_WITH_LIGAND).unwrap();
        let declared = DIPEPTIDE_WITH_LIGAND
            .lines()
            .filter(|l| l.starts_with("ATOM") || l.starts_with("HETATM"))
            .count();
        assert_eq!(system.atom_count(), declared);
    }

    #[test]
    fn alternate_locations_other_than_a_are_skipped() {
        let content = "\
ATOM      1  N  AGLY A   1      -0.500   0.800   0.000  1.00  0.00           N
ATOM      2  N  BGLY A   1      -0.400   0.700   0.000  1.00  0.00           N
END
";
        let (system, _) = read(content).unwrap();
        assert_eq!(system.atom_count(), 1);
    }

    #[test]
    fn truncated_record_is_fatal() {
        let content = "ATOM      1  N   GLY A   1      -0.500\nEND\n";
        let result = read(content);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            })
        ));
    }

    #[test]
    fn file_without_structural_records_is_fatal() {
        let result = read("HEADER    EMPTY FILE\nEND\n");
        assert!(matches!(result, Err(PdbError::Empty)));
    }

    #[test]
    fn duplicate_serial_is_fatal() {
        let content = "\
ATOM      1  N   GLY A   1      -0.500   0.800   0.000  1.00  0.00           N
ATOM      1  CA  GLY A   1       0.900   0.900   0.100  1.00  0.00           C
END
";
        let result = read(content);
        assert!(matches!(result, Err(PdbError::Inconsistency(_))));
    }

    #[test]
    fn ter_record_consumes_a_serial() {
        let (system, metadata) = read(DIPEPTIDE_WITH_LIGAND).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_to(&system, &metadata, &mut buffer).unwrap();
        let written = String::from_utf8(buffer).unwrap();

        let serial_of = |line: &str| line[6..11].trim().parse::<usize>().unwrap();
        let ter = written.lines().find(|l| l.starts_with("TER")).unwrap();
        let first_het = written.lines().find(|l| l.starts_with("HETATM")).unwrap();

        // Nine protein atoms, then the chain terminator, then the het groups.
        assert_eq!(serial_of(ter), 10);
        assert_eq!(serial_of(first_het), 11);

        let mut seen = HashSet::new();
        for line in written.lines() {
            if line.starts_with("ATOM")
                || line.starts_with("HETATM")
                || line.starts_with("TER")
            {
                assert!(seen.insert(serial_of(line)), "duplicate serial: {}", line);
            }
        }
    }

    #[test]
    fn written_output_parses_back_with_same_counts() {
        let (system, metadata) = read(DIPEPTIDE_WITH_LIGAND).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_to(&system, &metadata, &mut buffer).unwrap();

        let (reread, _) = read(std::str::from_utf8(&buffer).unwrap()).unwrap();
        assert_eq!(reread.atom_count(), system.atom_count());
        assert_eq!(reread.bonds().len(), system.bonds().len());
        assert_eq!(reread.chains_iter().count(), system.chains_iter().count());
    }
}
