use crate::core::utils::masses;

/// Represents a single atom of a topology, independent of any frame.
///
/// Positions are not stored here: a topology describes identity (names,
/// residue membership, element and mass) while coordinates live in the
/// frames supplied by a [`FrameSource`](crate::engine::source::FrameSource).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number as written in the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The name of the parent residue (e.g., "ALA").
    pub residue_name: String,
    /// The sequence number of the parent residue.
    pub residue_number: isize,
    /// The chain identifier of the parent residue.
    pub chain_id: char,
    /// The element symbol, upper-cased (e.g., "C", "FE").
    pub element: String,
    /// The atomic mass in daltons; zero when the element is unknown.
    pub mass: f64,
}

impl Atom {
    /// Creates a new `Atom`, deriving the element from the atom name and the
    /// mass from the element.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `residue_name` - The name of the residue this atom belongs to.
    /// * `residue_number` - The sequence number of the residue.
    /// * `chain_id` - The chain identifier.
    pub fn new(
        serial: usize,
        name: &str,
        residue_name: &str,
        residue_number: isize,
        chain_id: char,
    ) -> Self {
        let element = masses::guess_element(name);
        let mass = masses::mass_of(&element).unwrap_or(0.0);
        Self {
            serial,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            residue_number,
            chain_id,
            element,
            mass,
        }
    }

    /// Replaces the element of this atom and recomputes its mass.
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.trim().to_ascii_uppercase();
        self.mass = masses::mass_of(&self.element).unwrap_or(0.0);
        self
    }

    /// A compact label of the form `chain:residue:name`, used for matrix headers.
    pub fn label(&self) -> String {
        format!("{}:{}:{}", self.chain_id, self.residue_number, self.name)
    }
}
