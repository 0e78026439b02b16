use phf::{Map, Set, phf_map, phf_set};

static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008, "D" => 2.014, "HE" => 4.0026,
    "LI" => 6.94, "BE" => 9.0122, "B" => 10.81, "C" => 12.011, "N" => 14.007,
    "O" => 15.999, "F" => 18.998, "NE" => 20.180,
    "NA" => 22.990, "MG" => 24.305, "AL" => 26.982, "SI" => 28.085, "P" => 30.974,
    "S" => 32.06, "CL" => 35.45, "AR" => 39.948,
    "K" => 39.098, "CA" => 40.078, "MN" => 54.938, "FE" => 55.845, "CO" => 58.933,
    "NI" => 58.693, "CU" => 63.546, "ZN" => 65.38, "SE" => 78.971, "BR" => 79.904,
    "RB" => 85.468, "SR" => 87.62, "CD" => 112.41, "I" => 126.90, "CS" => 132.91,
    "BA" => 137.33, "HG" => 200.59,
};

/// Atom names that denote a two-letter element rather than e.g. a carbon or
/// nitrogen with a greek-letter suffix.
static TWO_LETTER_ATOM_NAMES: Set<&'static str> = phf_set! {
    "FE", "ZN", "MG", "CL", "MN", "CU", "BR", "SE", "NI", "LI", "RB", "CS", "SR", "BA",
};

/// Looks up the standard atomic mass of an element symbol (case-insensitive).
pub fn mass_of(element: &str) -> Option<f64> {
    ATOMIC_MASSES
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Guesses an element symbol from a PDB-style atom name.
///
/// Leading digits are skipped (`1HB` -> `H`). A name is only read as a
/// two-letter element when it exactly matches a known ion name, since
/// protein names like `CA` or `ND1` start with single-letter elements.
pub fn guess_element(atom_name: &str) -> String {
    let upper = atom_name.trim().to_ascii_uppercase();
    let stripped = upper.trim_start_matches(|c: char| c.is_ascii_digit());

    if TWO_LETTER_ATOM_NAMES.contains(stripped) {
        return stripped.to_string();
    }

    stripped
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
        .unwrap_or_default()
}
