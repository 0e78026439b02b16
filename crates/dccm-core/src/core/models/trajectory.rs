use nalgebra::Point3;

/// An in-memory sequence of coordinate frames sharing one atom count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    n_atoms: usize,
    frames: Vec<Vec<Point3<f64>>>,
}

impl Trajectory {
    pub fn new(n_atoms: usize) -> Self {
        Self {
            n_atoms,
            frames: Vec::new(),
        }
    }

    /// Builds a trajectory from frames, returning `None` if they disagree on
    /// the atom count.
    pub fn from_frames(frames: Vec<Vec<Point3<f64>>>) -> Option<Self> {
        let n_atoms = frames.first().map_or(0, Vec::len);
        if frames.iter().any(|f| f.len() != n_atoms) {
            return None;
        }
        Some(Self { n_atoms, frames })
    }

    /// Appends a frame. On atom-count mismatch the frame is handed back.
    pub fn push(&mut self, frame: Vec<Point3<f64>>) -> Result<(), Vec<Point3<f64>>> {
        if frame.len() != self.n_atoms {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&[Point3<f64>]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn frames(&self) -> impl Iterator<Item = &[Point3<f64>]> {
        self.frames.iter().map(Vec::as_slice)
    }
}
