use super::error::DccmError;
use crate::core::utils::geometry::weighted_centroid;
use nalgebra::{Matrix3, Point3};

// x' = reference_centroid + rotation · (x - mobile_centroid)
#[derive(Debug, Clone, PartialEq)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub mobile_centroid: Point3<f64>,
    pub reference_centroid: Point3<f64>,
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            mobile_centroid: Point3::origin(),
            reference_centroid: Point3::origin(),
        }
    }

    #[inline]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.reference_centroid + self.rotation * (point - self.mobile_centroid)
    }

    pub fn apply(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply_point(p)).collect()
    }
}

pub trait Aligner {
    fn superpose(
        &self,
        mobile: &[Point3<f64>],
        reference: &[Point3<f64>],
        weights: Option<&[f64]>,
    ) -> Result<RigidTransform, DccmError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAligner;

impl Aligner for IdentityAligner {
    fn superpose(
        &self,
        mobile: &[Point3<f64>],
        reference: &[Point3<f64>],
        _weights: Option<&[f64]>,
    ) -> Result<RigidTransform, DccmError> {
        check_lengths(mobile, reference)?;
        Ok(RigidTransform::identity())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KabschAligner;

impl Aligner for KabschAligner {
    fn superpose(
        &self,
        mobile: &[Point3<f64>],
        reference: &[Point3<f64>],
        weights: Option<&[f64]>,
    ) -> Result<RigidTransform, DccmError> {
        check_lengths(mobile, reference)?;
        if let Some(w) = weights {
            if w.len() != mobile.len() {
                return Err(DccmError::Alignment(format!(
                    "expected {} weights, got {}",
                    mobile.len(),
                    w.len()
                )));
            }
        }

        let centroids = weighted_centroid(mobile, weights).zip(weighted_centroid(reference, weights));
        let Some((mobile_centroid, reference_centroid)) = centroids else {
            return Err(DccmError::Alignment(
                "cannot fit an empty or zero-weight coordinate set".into(),
            ));
        };

        let mut h = Matrix3::zeros();
        for (i, (x, y)) in mobile.iter().zip(reference).enumerate() {
            let wi = weights.map_or(1.0, |w| w[i]);
            let xr = x - mobile_centroid;
            let yr = y - reference_centroid;
            h += (xr * yr.transpose()) * wi;
        }

        let svd = h.svd(true, true);
        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            return Err(DccmError::Alignment(
                "singular value decomposition did not converge".into(),
            ));
        };
        let mut rotation = v_t.transpose() * u.transpose();
        if rotation.determinant() < 0.0 {
            let mut v_t_adj = v_t;
            v_t_adj.row_mut(2).neg_mut();
            rotation = v_t_adj.transpose() * u.transpose();
        }

        Ok(RigidTransform {
            rotation,
            mobile_centroid,
            reference_centroid,
        })
    }
}

fn check_lengths(mobile: &[Point3<f64>], reference: &[Point3<f64>]) -> Result<(), DccmError> {
    if mobile.len() != reference.len() {
        return Err(DccmError::ShapeMismatch {
            expected: reference.len(),
            found: mobile.len(),
            frame: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::geometry::calculate_rmsd;
    use nalgebra::{Rotation3, Unit, Vector3};

    const TOLERANCE: f64 = 1e-9;

    fn reference() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.0, 1.4, 0.0),
            Point3::new(3.5, 1.6, 0.8),
            Point3::new(4.1, 0.2, 1.9),
        ]
    }

    fn moved(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.3, -1.0, 0.5)),
            1.1,
        );
        let shift = Vector3::new(-4.0, 7.5, 2.25);
        points.iter().map(|p| rotation * p + shift).collect()
    }

    #[test]
    fn kabsch_recovers_rigid_motion() {
        let reference = reference();
        let mobile = moved(&reference);
        let transform = KabschAligner.superpose(&mobile, &reference, None).unwrap();
        let aligned = transform.apply(&mobile);
        assert!(calculate_rmsd(&aligned, &reference).unwrap() < TOLERANCE);
        assert!((transform.rotation.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn kabsch_never_returns_a_reflection() {
        let reference = reference();
        let mirrored: Vec<_> = reference
            .iter()
            .map(|p| Point3::new(-p.x, p.y, p.z))
            .collect();
        let transform = KabschAligner.superpose(&mirrored, &reference, None).unwrap();
        assert!((transform.rotation.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn zero_weight_atoms_do_not_influence_the_fit() {
        let reference = reference();
        let mut mobile = moved(&reference);
        mobile[4] += Vector3::new(3.0, -2.0, 5.0);
        let weights = [12.0, 14.0, 12.0, 16.0, 0.0];

        let transform = KabschAligner
            .superpose(&mobile, &reference, Some(&weights))
            .unwrap();
        let aligned = transform.apply(&mobile);
        assert!(calculate_rmsd(&aligned[..4], &reference[..4]).unwrap() < TOLERANCE);
    }

    #[test]
    fn kabsch_leaves_inputs_untouched() {
        let reference = reference();
        let mobile = moved(&reference);
        let (reference_copy, mobile_copy) = (reference.clone(), mobile.clone());
        KabschAligner.superpose(&mobile, &reference, None).unwrap();
        assert_eq!(reference, reference_copy);
        assert_eq!(mobile, mobile_copy);
    }

    #[test]
    fn mismatched_lengths_are_shape_mismatch() {
        let reference = reference();
        let result = KabschAligner.superpose(&reference[..3], &reference, None);
        assert!(matches!(
            result,
            Err(DccmError::ShapeMismatch {
                expected: 5,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn wrong_weight_count_and_zero_total_weight_are_alignment_errors() {
        let reference = reference();
        assert!(matches!(
            KabschAligner.superpose(&reference, &reference, Some(&[1.0])),
            Err(DccmError::Alignment(_))
        ));
        assert!(matches!(
            KabschAligner.superpose(&reference, &reference, Some(&[0.0; 5])),
            Err(DccmError::Alignment(_))
        ));
    }

    #[test]
    fn identity_aligner_returns_points_unchanged() {
        let reference = reference();
        let mobile = moved(&reference);
        let transform = IdentityAligner.superpose(&mobile, &reference, None).unwrap();
        assert_eq!(transform.apply(&mobile), mobile);
    }
}
