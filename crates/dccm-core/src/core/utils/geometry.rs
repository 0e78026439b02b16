use nalgebra::{Point3, Vector3};

/// Computes the (optionally weighted) centroid of a set of points.
///
/// Returns `None` for an empty input, mismatched weight length, or weights
/// summing to zero.
pub fn weighted_centroid(points: &[Point3<f64>], weights: Option<&[f64]>) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    match weights {
        Some(w) => {
            if w.len() != points.len() {
                return None;
            }
            let total: f64 = w.iter().sum();
            if total == 0.0 {
                return None;
            }
            let sum = points
                .iter()
                .zip(w)
                .fold(Vector3::zeros(), |acc, (p, &wi)| acc + p.coords * wi);
            Some(Point3::from(sum / total))
        }
        None => {
            let sum = points
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.coords);
            Some(Point3::from(sum / points.len() as f64))
        }
    }
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    calculate_weighted_rmsd(coords1, coords2, None)
}

/// Root-mean-square deviation between two equally sized point sets, with
/// optional per-point weights.
pub fn calculate_weighted_rmsd(
    coords1: &[Point3<f64>],
    coords2: &[Point3<f64>],
    weights: Option<&[f64]>,
) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let (squared_dist_sum, total_weight) = match weights {
        Some(w) if w.len() == coords1.len() => coords1
            .iter()
            .zip(coords2)
            .zip(w)
            .fold((0.0, 0.0), |(sum, total), ((p1, p2), &wi)| {
                (sum + wi * (p1 - p2).norm_squared(), total + wi)
            }),
        Some(_) => return None,
        None => (
            coords1
                .iter()
                .zip(coords2)
                .map(|(p1, p2)| (p1 - p2).norm_squared())
                .sum(),
            coords1.len() as f64,
        ),
    };
    if total_weight == 0.0 {
        return None;
    }
    Some((squared_dist_sum / total_weight).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ]
    }

    #[test]
    fn centroid_without_weights_is_arithmetic_mean() {
        let c = weighted_centroid(&points(), None).unwrap();
        assert!((c - Point3::new(2.0 / 3.0, 4.0 / 3.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn centroid_is_pulled_towards_heavier_points() {
        let c = weighted_centroid(&points(), Some(&[0.0, 3.0, 1.0])).unwrap();
        assert!((c - Point3::new(1.5, 1.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn centroid_rejects_degenerate_input() {
        assert!(weighted_centroid(&[], None).is_none());
        assert!(weighted_centroid(&points(), Some(&[1.0])).is_none());
        assert!(weighted_centroid(&points(), Some(&[0.0, 0.0, 0.0])).is_none());
    }

    #[test]
    fn rmsd_of_identical_sets_is_zero() {
        assert_eq!(calculate_rmsd(&points(), &points()), Some(0.0));
    }

    #[test]
    fn rmsd_of_uniform_shift_equals_shift_length() {
        let shifted: Vec<_> = points()
            .iter()
            .map(|p| p + Vector3::new(0.0, 0.0, 3.0))
            .collect();
        let rmsd = calculate_rmsd(&points(), &shifted).unwrap();
        assert!((rmsd - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn weighted_rmsd_ignores_zero_weight_points() {
        let mut moved = points();
        moved[2] = Point3::new(10.0, 10.0, 10.0);
        let rmsd = calculate_weighted_rmsd(&points(), &moved, Some(&[1.0, 1.0, 0.0])).unwrap();
        assert!(rmsd.abs() < TOLERANCE);
    }

    #[test]
    fn rmsd_rejects_mismatched_lengths() {
        assert!(calculate_rmsd(&points(), &points()[..2]).is_none());
    }
}
