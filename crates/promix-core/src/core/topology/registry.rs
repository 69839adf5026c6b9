use crate::core::models::chain::ChainType;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// One atom of a residue template.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TemplateAtom {
    pub name: String,
    /// Force-field atom type assigned to this atom.
    #[serde(rename = "type")]
    pub ff_type: String,
    /// Partial charge in elementary charge units.
    pub charge: f64,
}

/// Template describing how to type and connect one residue.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplate {
    pub atoms: Vec<TemplateAtom>,
    /// Intra-residue bonds as atom-name pairs.
    #[serde(default)]
    pub bonds: Vec<[String; 2]>,
    /// Atom that accepts the bond from the previous residue (e.g., "N").
    #[serde(default)]
    pub link_in: Option<String>,
    /// Atom that bonds to the next residue (e.g., "C").
    #[serde(default)]
    pub link_out: Option<String>,
}

/// A registry of residue templates loaded from a TOML file.
///
/// Protein and water structures arrive without force-field types or partial
/// charges; applying the registry fills those in and reconstructs the
/// connectivity the structure file does not record.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    registry: HashMap<String, ResidueTemplate>,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("No template found for residue '{residue_name}' (chain {chain_id}, number {residue_number})")]
    UnknownResidue {
        residue_name: String,
        chain_id: char,
        residue_number: isize,
    },
    #[error(
        "Atom '{atom_name}' of residue '{residue_name}' {residue_number} is not part of its template"
    )]
    UntypedAtom {
        atom_name: String,
        residue_name: String,
        residue_number: isize,
    },
}

impl TemplateRegistry {
    /// Loads a template registry from a TOML file keyed by residue name.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let registry: HashMap<String, ResidueTemplate> =
            toml::from_str(&content).map_err(|e| TemplateError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self { registry })
    }

    pub fn get(&self, residue_name: &str) -> Option<&ResidueTemplate> {
        self.registry.get(residue_name)
    }

    /// Types every protein and water residue in `system` from its template
    /// and reconstructs residue-internal and inter-residue connectivity.
    ///
    /// Template atoms absent from the structure (typically unresolved
    /// hydrogens) are tolerated; structure atoms absent from the template are
    /// a fatal typing error. Ligand and other het chains are left untouched.
    pub fn apply(&self, system: &mut MolecularSystem) -> Result<(), TemplateError> {
        let chain_ids: Vec<_> = system.chains_iter().map(|(id, _)| id).collect();

        for chain_id in chain_ids {
            let chain = system.chain(chain_id).unwrap();
            if !matches!(chain.chain_type, ChainType::Protein | ChainType::Water) {
                continue;
            }
            let chain_letter = chain.id;
            let residue_ids: Vec<ResidueId> = chain.residues().to_vec();

            let mut previous_link_out: Option<AtomId> = None;
            for &residue_id in &residue_ids {
                previous_link_out =
                    self.apply_to_residue(system, residue_id, chain_letter, previous_link_out)?;
            }
        }
        Ok(())
    }

    /// Applies the template to one residue; returns the atom that links to
    /// the next residue, if the template defines one.
    fn apply_to_residue(
        &self,
        system: &mut MolecularSystem,
        residue_id: ResidueId,
        chain_id: char,
        previous_link_out: Option<AtomId>,
    ) -> Result<Option<AtomId>, TemplateError> {
        let (residue_name, residue_number, atom_ids) = {
            let residue = system.residue(residue_id).unwrap();
            (
                residue.name.clone(),
                residue.residue_number,
                residue.atoms().to_vec(),
            )
        };

        let template =
            self.registry
                .get(&residue_name)
                .ok_or_else(|| TemplateError::UnknownResidue {
                    residue_name: residue_name.clone(),
                    chain_id,
                    residue_number,
                })?;

        let by_name: HashMap<&str, &TemplateAtom> = template
            .atoms
            .iter()
            .map(|a| (a.name.as_str(), a))
            .collect();

        for atom_id in &atom_ids {
            let atom = system.atom_mut(*atom_id).unwrap();
            let template_atom =
                by_name
                    .get(atom.name.as_str())
                    .ok_or_else(|| TemplateError::UntypedAtom {
                        atom_name: atom.name.clone(),
                        residue_name: residue_name.clone(),
                        residue_number,
                    })?;
            atom.force_field_type = template_atom.ff_type.clone();
            atom.partial_charge = template_atom.charge;
        }

        let find_atom = |system: &MolecularSystem, name: &str| -> Option<AtomId> {
            system
                .residue(residue_id)
                .and_then(|r| r.get_first_atom_id_by_name(name))
        };

        for [name1, name2] in &template.bonds {
            match (find_atom(system, name1), find_atom(system, name2)) {
                (Some(a1), Some(a2)) => {
                    system.add_bond(a1, a2, BondOrder::Single);
                }
                _ => {
                    // Template atoms may be unresolved in the structure
                    // (missing hydrogens); their bonds are simply absent.
                    warn!(
                        residue = %residue_name,
                        number = residue_number,
                        bond = %format!("{}-{}", name1, name2),
                        "Skipping template bond with unresolved atom"
                    );
                }
            }
        }

        if let (Some(prev), Some(link_in)) = (previous_link_out, &template.link_in) {
            if let Some(this_end) = find_atom(system, link_in) {
                system.add_bond(prev, this_end, BondOrder::Single);
            }
        }

        Ok(template
            .link_out
            .as_ref()
            .and_then(|name| find_atom(system, name)))
    }
}
