use super::accumulator::DisplacementTrajectory;
use super::error::DccmError;
use nalgebra::{DMatrix, Vector3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const AXES: f64 = 3.0;

// C[i,j] = (1/F) Σ_f Σ_a (D[f,i,a] - M[i,a]) (D[f,j,a] - M[j,a]) / 3
// Upper triangle only, mirrored.
#[instrument(skip_all, name = "covariance_task")]
pub fn covariance_matrix(trajectory: &DisplacementTrajectory) -> Result<DMatrix<f64>, DccmError> {
    let n_frames = trajectory.n_frames();
    if n_frames < 2 {
        return Err(DccmError::DegenerateTrajectory { frames: n_frames });
    }
    let n_atoms = trajectory.n_atoms();
    debug!(n_atoms, n_frames, "Computing covariance matrix.");

    let series = atom_major(&trajectory.centered(), n_frames, n_atoms);
    let denominator = AXES * n_frames as f64;

    let upper_row = |i: usize| -> Vec<f64> {
        let xi = &series[i * n_frames..(i + 1) * n_frames];
        (i..n_atoms)
            .map(|j| {
                let xj = &series[j * n_frames..(j + 1) * n_frames];
                let sum: f64 = xi.iter().zip(xj).map(|(a, b)| a.dot(b)).sum();
                sum / denominator
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..n_atoms).map(upper_row).collect();

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..n_atoms).into_par_iter().map(upper_row).collect();

    let mut covariance = DMatrix::zeros(n_atoms, n_atoms);
    for (i, row) in rows.into_iter().enumerate() {
        for (offset, value) in row.into_iter().enumerate() {
            let j = i + offset;
            covariance[(i, j)] = value;
            covariance[(j, i)] = value;
        }
    }
    Ok(covariance)
}

fn atom_major(centered: &[Vector3<f64>], n_frames: usize, n_atoms: usize) -> Vec<Vector3<f64>> {
    let mut series = Vec::with_capacity(centered.len());
    for atom in 0..n_atoms {
        series.extend((0..n_frames).map(|f| centered[f * n_atoms + atom]));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::accumulator::DisplacementAccumulator;
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-12;

    fn trajectory(frames: &[Vec<Point3<f64>>]) -> DisplacementTrajectory {
        DisplacementAccumulator::collect(frames[0].len(), frames.iter().map(Vec::as_slice))
            .unwrap()
    }

    fn lockstep_frames() -> Vec<Vec<Point3<f64>>> {
        [1.0, -1.0, 1.0, -1.0]
            .iter()
            .map(|&x| {
                vec![
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(10.0 + x, 0.0, 0.0),
                    Point3::new(-x, 5.0, 0.0),
                ]
            })
            .collect()
    }

    fn pseudo_random_frames(n_frames: usize, n_atoms: usize) -> Vec<Vec<Point3<f64>>> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 4.0 - 2.0
        };
        (0..n_frames)
            .map(|_| {
                (0..n_atoms)
                    .map(|a| Point3::new(a as f64 + next(), next(), next()))
                    .collect()
            })
            .collect()
    }

    /// Direct transcription of the formula with explicit means.
    fn reference_covariance(frames: &[Vec<Point3<f64>>]) -> DMatrix<f64> {
        let f = frames.len();
        let n = frames[0].len();
        let mut mean = vec![[0.0; 3]; n];
        for frame in frames {
            for (i, p) in frame.iter().enumerate() {
                for a in 0..3 {
                    mean[i][a] += p[a] / f as f64;
                }
            }
        }
        DMatrix::from_fn(n, n, |i, j| {
            let mut total = 0.0;
            for frame in frames {
                for a in 0..3 {
                    total += (frame[i][a] - mean[i][a]) * (frame[j][a] - mean[j][a]);
                }
            }
            total / (3.0 * f as f64)
        })
    }

    #[test]
    fn single_frame_is_degenerate() {
        let traj = trajectory(&lockstep_frames()[..1]);
        assert!(matches!(
            covariance_matrix(&traj),
            Err(DccmError::DegenerateTrajectory { frames: 1 })
        ));
    }

    #[test]
    fn hand_computed_lockstep_covariance() {
        let cov = covariance_matrix(&trajectory(&lockstep_frames())).unwrap();
        let third = 1.0 / 3.0;
        let expected = DMatrix::from_row_slice(
            3,
            3,
            &[
                third, third, -third, //
                third, third, -third, //
                -third, -third, third,
            ],
        );
        assert!((cov - expected).abs().max() < TOLERANCE);
    }

    #[test]
    fn matches_per_axis_averaged_formula() {
        let frames = pseudo_random_frames(7, 5);
        let cov = covariance_matrix(&trajectory(&frames)).unwrap();
        let expected = reference_covariance(&frames);
        assert!((cov - expected).abs().max() < 1e-10);
    }

    #[test]
    fn result_is_exactly_symmetric_with_nonnegative_diagonal() {
        let cov = covariance_matrix(&trajectory(&pseudo_random_frames(9, 6))).unwrap();
        assert_eq!(cov, cov.transpose());
        assert!(cov.diagonal().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn identical_frames_give_exact_zero_matrix() {
        let frame = vec![Point3::new(0.1, 0.2, 0.3), Point3::new(1.7, -2.9, 0.05)];
        let frames = vec![frame.clone(), frame.clone(), frame];
        let cov = covariance_matrix(&trajectory(&frames)).unwrap();
        assert!(cov.iter().all(|&v| v == 0.0));
    }
}
