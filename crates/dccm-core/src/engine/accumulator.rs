use super::error::DccmError;
use nalgebra::{Point3, Vector3};

// Frame-major F×N block of aligned points.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementTrajectory {
    n_frames: usize,
    n_atoms: usize,
    positions: Vec<Point3<f64>>,
}

impl DisplacementTrajectory {
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn frame(&self, f: usize) -> &[Point3<f64>] {
        &self.positions[f * self.n_atoms..(f + 1) * self.n_atoms]
    }

    pub fn frames(&self) -> impl Iterator<Item = &[Point3<f64>]> {
        self.positions.chunks_exact(self.n_atoms)
    }

    pub fn mean_positions(&self) -> Vec<Point3<f64>> {
        let origin = self.frame(0);
        self.mean_offsets()
            .into_iter()
            .zip(origin)
            .map(|(offset, p)| p + offset)
            .collect()
    }

    // Relative to frame 0, so atoms that never move center to exactly zero.
    pub(crate) fn mean_offsets(&self) -> Vec<Vector3<f64>> {
        let origin = self.frame(0);
        let mut sums = vec![Vector3::zeros(); self.n_atoms];
        for frame in self.frames() {
            for ((sum, p), o) in sums.iter_mut().zip(frame).zip(origin) {
                *sum += p - o;
            }
        }
        let inv = 1.0 / self.n_frames as f64;
        sums.into_iter().map(|s| s * inv).collect()
    }

    pub fn centered(&self) -> Vec<Vector3<f64>> {
        let origin = self.frame(0);
        let means = self.mean_offsets();
        let mut out = Vec::with_capacity(self.positions.len());
        for frame in self.frames() {
            for ((p, o), m) in frame.iter().zip(origin).zip(&means) {
                out.push((p - o) - m);
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct DisplacementAccumulator {
    n_atoms: usize,
    n_frames: usize,
    positions: Vec<Point3<f64>>,
}

impl DisplacementAccumulator {
    pub fn new(n_atoms: usize) -> Self {
        Self {
            n_atoms,
            n_frames: 0,
            positions: Vec::new(),
        }
    }

    pub fn with_capacity(n_atoms: usize, n_frames: usize) -> Self {
        Self {
            n_atoms,
            n_frames: 0,
            positions: Vec::with_capacity(n_atoms * n_frames),
        }
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    // A rejected frame leaves the accumulator unchanged.
    pub fn push(&mut self, coords: &[Point3<f64>]) -> Result<(), DccmError> {
        if coords.len() != self.n_atoms {
            return Err(DccmError::ShapeMismatch {
                expected: self.n_atoms,
                found: coords.len(),
                frame: Some(self.n_frames),
            });
        }
        self.positions.extend_from_slice(coords);
        self.n_frames += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<DisplacementTrajectory, DccmError> {
        if self.n_atoms == 0 {
            return Err(DccmError::InsufficientAtoms { found: 0 });
        }
        if self.n_frames == 0 {
            return Err(DccmError::EmptyTrajectory);
        }
        Ok(DisplacementTrajectory {
            n_frames: self.n_frames,
            n_atoms: self.n_atoms,
            positions: self.positions,
        })
    }

    pub fn collect<'a, I>(n_atoms: usize, frames: I) -> Result<DisplacementTrajectory, DccmError>
    where
        I: IntoIterator<Item = &'a [Point3<f64>]>,
    {
        let mut acc = Self::new(n_atoms);
        for frame in frames {
            acc.push(frame)?;
        }
        acc.finish()
    }
}
