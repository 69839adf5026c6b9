//! Element data shared across the crate: atomic masses and element-symbol
//! inference from the naming conventions of the supported file formats.

use phf::phf_map;

/// Standard atomic weights (amu) for the elements that occur in
/// protein-ligand systems. Values follow the IUPAC 2021 abridged table.
static ATOMIC_MASSES: phf::Map<&'static str, f64> = phf_map! {
    "H" => 1.008,
    "C" => 12.011,
    "N" => 14.007,
    "O" => 15.999,
    "F" => 18.998,
    "Na" => 22.990,
    "Mg" => 24.305,
    "P" => 30.974,
    "S" => 32.06,
    "Cl" => 35.45,
    "K" => 39.098,
    "Ca" => 40.078,
    "Mn" => 54.938,
    "Fe" => 55.845,
    "Co" => 58.933,
    "Ni" => 58.693,
    "Cu" => 63.546,
    "Zn" => 65.38,
    "Se" => 78.971,
    "Br" => 79.904,
    "I" => 126.904,
};

/// Looks up the atomic mass (amu) for an element symbol.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ATOMIC_MASSES.get(symbol).copied()
}

/// Normalizes an element symbol to its canonical capitalization ("CL" -> "Cl").
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => {
            let mut s = first.to_ascii_uppercase().to_string();
            s.extend(chars.map(|c| c.to_ascii_lowercase()));
            s
        }
        None => String::new(),
    }
}

/// Extracts the element from a SYBYL atom type ("C.3" -> "C", "N.ar" -> "N").
pub fn element_from_sybyl_type(sybyl_type: &str) -> String {
    let base = sybyl_type.split('.').next().unwrap_or(sybyl_type);
    normalize_symbol(base)
}

/// Derives an element symbol from a PDB atom name when the element column is
/// absent or blank.
///
/// PDB names right-pad single-letter elements ("CA " is a calcium *ion* only
/// in het groups; in protein residues it is an alpha-carbon), so the heuristic
/// is: take the leading alphabetic characters, prefer a known two-letter
/// element, otherwise fall back to the first letter.
pub fn element_from_pdb_name(name: &str) -> Option<String> {
    let letters: String = name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    if letters.len() >= 2 {
        let two = normalize_symbol(&letters[..2]);
        if ATOMIC_MASSES.contains_key(two.as_str()) && !matches!(two.as_str(), "Ca" | "Cu" | "Co")
        {
            // Two-letter matches like Cl/Br are reliable; Ca/Cu/Co collide with
            // common carbon names (CA, CB, CU...) and stay single-letter here.
            return Some(two);
        }
    }
    let one = normalize_symbol(&letters[..1]);
    if ATOMIC_MASSES.contains_key(one.as_str()) {
        Some(one)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_mass_covers_common_elements() {
        assert_eq!(atomic_mass("H"), Some(1.008));
        assert_eq!(atomic_mass("C"), Some(12.011));
        assert_eq!(atomic_mass("Cl"), Some(35.45));
        assert_eq!(atomic_mass("Xx"), None);
    }

    #[test]
    fn normalize_symbol_fixes_capitalization() {
        assert_eq!(normalize_symbol("CL"), "Cl");
        assert_eq!(normalize_symbol("c"), "C");
        assert_eq!(normalize_symbol(" br "), "Br");
        assert_eq!(normalize_symbol(""), "");
    }

    #[test]
    fn element_from_sybyl_type_strips_hybridization() {
        assert_eq!(element_from_sybyl_type("C.3"), "C");
        assert_eq!(element_from_sybyl_type("N.ar"), "N");
        assert_eq!(element_from_sybyl_type("CL"), "Cl");
        assert_eq!(element_from_sybyl_type("O.co2"), "O");
    }

    #[test]
    fn element_from_pdb_name_prefers_reliable_two_letter_symbols() {
        assert_eq!(element_from_pdb_name("CL1").as_deref(), Some("Cl"));
        assert_eq!(element_from_pdb_name("BR").as_deref(), Some("Br"));
        // CA in a protein residue is an alpha-carbon, not calcium.
        assert_eq!(element_from_pdb_name("CA").as_deref(), Some("C"));
        assert_eq!(element_from_pdb_name("CB").as_deref(), Some("C"));
        assert_eq!(element_from_pdb_name("N").as_deref(), Some("N"));
        // Hydrogen names with leading digits still resolve.
        assert_eq!(element_from_pdb_name("1HG2").as_deref(), Some("H"));
        assert_eq!(element_from_pdb_name("HG21").as_deref(), Some("H"));
        assert_eq!(element_from_pdb_name("").as_deref(), None);
    }
}
