use crate::cli::InspectArgs;
use crate::commands::load_inputs;
use crate::error::{CliError, Result};
use dccm::core::models::topology::Topology;
use dccm::core::selection::AtomSelection;
use std::collections::BTreeMap;
use tracing::{info, warn};

const PREVIEW_LIMIT: usize = 10;

pub fn run(args: InspectArgs) -> Result<()> {
    let (topology, trajectory) = load_inputs(&args.topology, args.trajectory.as_deref())?;

    println!("Topology: {}", args.topology.display());
    println!(
        "  Atoms: {}  Residues: {}  Frames: {}",
        topology.len(),
        topology.residue_count(),
        trajectory.len()
    );
    for (element, count) in element_counts(&topology) {
        println!("  {:<3} {}", element, count);
    }

    let unknown = topology.atoms().iter().filter(|a| a.mass == 0.0).count();
    if unknown > 0 {
        warn!(unknown, "Some atoms have no known mass.");
        println!("  {} atom(s) have an unknown element (mass 0)", unknown);
    }

    if let Some(expr) = &args.selection {
        let selection = AtomSelection::parse(expr)
            .map_err(|e| CliError::Argument(format!("--selection: {}", e)))?;
        let indices = selection.resolve(&topology);
        info!(selection = %selection, matched = indices.len(), "Resolved selection.");

        println!("Selection '{}' matches {} atom(s)", selection, indices.len());
        for label in topology
            .labels_of(&indices)
            .into_iter()
            .take(PREVIEW_LIMIT)
        {
            println!("  {}", label);
        }
        if indices.len() > PREVIEW_LIMIT {
            println!("  ... and {} more", indices.len() - PREVIEW_LIMIT);
        }
    }
    Ok(())
}

fn element_counts(topology: &Topology) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for atom in topology.atoms() {
        let element = if atom.element.is_empty() {
            "?"
        } else {
            atom.element.as_str()
        };
        *counts.entry(element).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use dccm::core::models::atom::Atom;
    use std::path::PathBuf;

    #[test]
    fn element_counts_group_by_symbol() {
        let topology = Topology::from_atoms(vec![
            Atom::new(1, "N", "ALA", 1, 'A'),
            Atom::new(2, "CA", "ALA", 1, 'A'),
            Atom::new(3, "C", "ALA", 1, 'A'),
            Atom::new(4, "ZN", "ZN", 2, 'A'),
        ]);
        let counts = element_counts(&topology);
        assert_eq!(counts.get("C"), Some(&2));
        assert_eq!(counts.get("N"), Some(&1));
        assert_eq!(counts.get("ZN"), Some(&1));
    }

    #[test]
    fn invalid_selection_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.pdb");
        std::fs::write(&path, crate::commands::test_support::multi_model_pdb(3, 2)).unwrap();

        let args = InspectArgs {
            topology: PathBuf::from(&path),
            trajectory: None,
            selection: Some("name CA and (".to_string()),
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
