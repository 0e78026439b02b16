use super::config::FrameRange;
use super::error::DccmError;
use crate::core::models::trajectory::Trajectory;
use nalgebra::Point3;

/// Random access to the coordinate frames of a trajectory.
///
/// Every frame holds `n_atoms()` points in topology order.
pub trait FrameSource {
    fn n_atoms(&self) -> usize;

    fn n_frames(&self) -> usize;

    fn frame(&self, index: usize) -> Result<&[Point3<f64>], DccmError>;

    /// Frames selected by `range`, in ascending order.
    fn sample<'s>(
        &'s self,
        range: &FrameRange,
    ) -> impl Iterator<Item = (usize, Result<&'s [Point3<f64>], DccmError>)> + 's
    where
        Self: Sized,
    {
        range
            .indices(self.n_frames())
            .map(move |index| (index, self.frame(index)))
    }
}

impl FrameSource for Trajectory {
    fn n_atoms(&self) -> usize {
        Trajectory::n_atoms(self)
    }

    fn n_frames(&self) -> usize {
        self.len()
    }

    fn frame(&self, index: usize) -> Result<&[Point3<f64>], DccmError> {
        Trajectory::frame(self, index).ok_or(DccmError::FrameOutOfRange {
            index,
            available: self.len(),
        })
    }
}
