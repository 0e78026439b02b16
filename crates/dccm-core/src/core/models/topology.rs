use super::atom::Atom;

/// An ordered list of atoms shared by every frame of a trajectory.
///
/// Atom indices used throughout the crate are positions in this list, so
/// frame coordinates must follow the same ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    atoms: Vec<Atom>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn push(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the masses of the given atoms, in the order of `indices`.
    ///
    /// Indices are expected to come from a resolved selection and therefore
    /// be in range; out-of-range indices yield a mass of zero.
    pub fn masses_of(&self, indices: &[usize]) -> Vec<f64> {
        indices
            .iter()
            .map(|&i| self.atoms.get(i).map_or(0.0, |a| a.mass))
            .collect()
    }

    pub fn labels_of(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| {
                self.atoms
                    .get(i)
                    .map_or_else(|| i.to_string(), Atom::label)
            })
            .collect()
    }

    /// Number of distinct residues, counted as runs of (chain, residue number).
    pub fn residue_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<(char, isize)> = None;
        for atom in &self.atoms {
            let key = (atom.chain_id, atom.residue_number);
            if last != Some(key) {
                count += 1;
                last = Some(key);
            }
        }
        count
    }
}
