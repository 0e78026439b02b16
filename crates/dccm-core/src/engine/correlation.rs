use super::error::DccmError;
use nalgebra::DMatrix;
use tracing::instrument;

/// Variances at or below this (Å²) count as zero.
pub const MIN_VARIANCE: f64 = 1e-24;

// R[i,j] = C[i,j] / sqrt(C[i,i] C[j,j]), unclamped.
#[instrument(skip_all, name = "correlation_task")]
pub fn correlation_matrix(covariance: &DMatrix<f64>) -> Result<DMatrix<f64>, DccmError> {
    let n = covariance.nrows();
    if covariance.ncols() != n {
        return Err(DccmError::ShapeMismatch {
            expected: n,
            found: covariance.ncols(),
            frame: None,
        });
    }

    let variances = covariance.diagonal();
    if let Some(atom) = variances
        .iter()
        .position(|v| !v.is_finite() || *v <= MIN_VARIANCE)
    {
        return Err(DccmError::ZeroVariance { atom });
    }
    let std_devs: Vec<f64> = variances.iter().map(|v| v.sqrt()).collect();

    Ok(DMatrix::from_fn(n, n, |i, j| {
        covariance[(i, j)] / (std_devs[i] * std_devs[j])
    }))
}
