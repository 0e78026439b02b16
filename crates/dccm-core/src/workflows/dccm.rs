use crate::core::models::topology::Topology;
use crate::engine::accumulator::{DisplacementAccumulator, DisplacementTrajectory};
use crate::engine::align::{Aligner, IdentityAligner, KabschAligner};
use crate::engine::config::{AlignmentMethod, DccmConfig, Weighting};
use crate::engine::correlation::correlation_matrix;
use crate::engine::covariance::covariance_matrix;
use crate::engine::error::DccmError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::source::FrameSource;
use nalgebra::{DMatrix, Point3};
use std::borrow::Cow;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct DccmResult {
    pub correlation: DMatrix<f64>,
    pub covariance: DMatrix<f64>,
    // Topology index of each matrix row.
    pub atom_indices: Vec<usize>,
    pub frame_indices: Vec<usize>,
}

impl DccmResult {
    pub fn n_atoms(&self) -> usize {
        self.atom_indices.len()
    }

    pub fn n_frames(&self) -> usize {
        self.frame_indices.len()
    }
}

#[instrument(skip_all, name = "dccm_compute")]
pub fn compute<'a, I, A>(
    frames: I,
    reference: &[Point3<f64>],
    weights: Option<&[f64]>,
    aligner: &A,
    reporter: &ProgressReporter,
) -> Result<DccmResult, DccmError>
where
    I: IntoIterator<Item = &'a [Point3<f64>]>,
    I::IntoIter: ExactSizeIterator,
    A: Aligner + ?Sized,
{
    if reference.len() < 2 {
        return Err(DccmError::InsufficientAtoms {
            found: reference.len(),
        });
    }
    let frames = frames.into_iter();
    let total = frames.len();
    let plan = FitPlan {
        n_atoms: reference.len(),
        reference_fit: Cow::Borrowed(reference),
        fit_indices: None,
        atom_indices: None,
        weights,
        aligner,
    };

    let (trajectory, frame_indices) = align_and_accumulate(
        &plan,
        frames.enumerate().map(Ok),
        total,
        reporter,
    )?;
    let (covariance, correlation) = normalize(&trajectory, reporter)?;

    Ok(DccmResult {
        correlation,
        covariance,
        atom_indices: (0..reference.len()).collect(),
        frame_indices,
    })
}

#[instrument(skip_all, name = "dccm_workflow")]
pub fn run<S: FrameSource>(
    topology: &Topology,
    source: &S,
    config: &DccmConfig,
    reporter: &ProgressReporter,
) -> Result<DccmResult, DccmError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        selection = %config.selection,
        alignment = %config.alignment,
        "Starting DCCM workflow."
    );

    let atom_indices = config.selection.resolve(topology);
    if atom_indices.len() < 2 {
        return Err(DccmError::InsufficientAtoms {
            found: atom_indices.len(),
        });
    }
    let fit_indices = match &config.fit_selection {
        Some(fit) => fit.resolve(topology),
        None => atom_indices.clone(),
    };
    if config.alignment == AlignmentMethod::Kabsch && fit_indices.is_empty() {
        return Err(DccmError::Alignment(format!(
            "fit selection '{}' matched no atoms",
            config.fit_selection()
        )));
    }

    if source.n_atoms() != topology.len() {
        return Err(DccmError::ShapeMismatch {
            expected: topology.len(),
            found: source.n_atoms(),
            frame: None,
        });
    }

    let reference = source.frame(config.reference_frame)?;
    if reference.len() != topology.len() {
        return Err(DccmError::ShapeMismatch {
            expected: topology.len(),
            found: reference.len(),
            frame: Some(config.reference_frame),
        });
    }
    let reference_fit: Vec<Point3<f64>> = fit_indices.iter().map(|&i| reference[i]).collect();

    let weights = match config.weighting {
        Weighting::Mass => fit_weights(topology, &fit_indices, reporter),
        Weighting::Uniform => None,
    };

    let aligner: &dyn Aligner = match config.alignment {
        AlignmentMethod::Kabsch => &KabschAligner,
        AlignmentMethod::None => &IdentityAligner,
    };

    let total = config.frames.count(source.n_frames());
    debug!(
        n_atoms = atom_indices.len(),
        n_fit_atoms = fit_indices.len(),
        n_frames = total,
        reference_frame = config.reference_frame,
        "Resolved selections and frame range."
    );
    reporter.report(Progress::PhaseFinish);

    let plan = FitPlan {
        n_atoms: topology.len(),
        reference_fit: Cow::Owned(reference_fit),
        fit_indices: Some(fit_indices.as_slice()),
        atom_indices: Some(atom_indices.as_slice()),
        weights: weights.as_deref(),
        aligner,
    };
    let frames = source
        .sample(&config.frames)
        .map(|(index, frame)| frame.map(|f| (index, f)));
    let (trajectory, frame_indices) = align_and_accumulate(&plan, frames, total, reporter)?;
    let (covariance, correlation) = normalize(&trajectory, reporter)?;

    info!(
        n_atoms = atom_indices.len(),
        n_frames = frame_indices.len(),
        "DCCM workflow complete."
    );
    Ok(DccmResult {
        correlation,
        covariance,
        atom_indices,
        frame_indices,
    })
}

fn fit_weights(
    topology: &Topology,
    fit_indices: &[usize],
    reporter: &ProgressReporter,
) -> Option<Vec<f64>> {
    for &index in fit_indices {
        if let Some(atom) = topology.atom(index) {
            if atom.mass == 0.0 {
                warn!(
                    atom = %atom.label(),
                    element = %atom.element,
                    "Unknown element; atom gets zero weight in the fit."
                );
            }
        }
    }
    let masses = topology.masses_of(fit_indices);
    if masses.iter().sum::<f64>() > 0.0 {
        Some(masses)
    } else {
        warn!("Fit atoms have no known masses; falling back to uniform weights.");
        reporter.report(Progress::Message(
            "No known masses among fit atoms; using uniform weights".to_string(),
        ));
        None
    }
}

struct FitPlan<'p, A: ?Sized> {
    n_atoms: usize,
    reference_fit: Cow<'p, [Point3<f64>]>,
    fit_indices: Option<&'p [usize]>,
    atom_indices: Option<&'p [usize]>,
    weights: Option<&'p [f64]>,
    aligner: &'p A,
}

impl<A: Aligner + ?Sized> FitPlan<'_, A> {
    fn align_frame(
        &self,
        index: usize,
        frame: &[Point3<f64>],
    ) -> Result<Vec<Point3<f64>>, DccmError> {
        if frame.len() != self.n_atoms {
            return Err(DccmError::ShapeMismatch {
                expected: self.n_atoms,
                found: frame.len(),
                frame: Some(index),
            });
        }
        let mobile_fit = gather(frame, self.fit_indices);
        let transform = self
            .aligner
            .superpose(&mobile_fit, &self.reference_fit, self.weights)?;
        Ok(transform.apply(&gather(frame, self.atom_indices)))
    }
}

fn gather<'f>(frame: &'f [Point3<f64>], indices: Option<&[usize]>) -> Cow<'f, [Point3<f64>]> {
    match indices {
        Some(indices) => Cow::Owned(indices.iter().map(|&i| frame[i]).collect()),
        None => Cow::Borrowed(frame),
    }
}

fn align_and_accumulate<'f, A, I>(
    plan: &FitPlan<'_, A>,
    frames: I,
    total: usize,
    reporter: &ProgressReporter,
) -> Result<(DisplacementTrajectory, Vec<usize>), DccmError>
where
    A: Aligner + ?Sized,
    I: Iterator<Item = Result<(usize, &'f [Point3<f64>]), DccmError>>,
{
    reporter.phase("Aligning Frames", || {
        info!(total, "Aligning frames onto the reference.");
        let n_selected = plan.atom_indices.map_or(plan.n_atoms, <[usize]>::len);
        let mut accumulator = DisplacementAccumulator::with_capacity(n_selected, total);
        let mut frame_indices = Vec::with_capacity(total);

        reporter.report(Progress::TaskStart {
            total_steps: total as u64,
        });
        for item in frames {
            let (index, frame) = item?;
            let aligned = plan.align_frame(index, frame)?;
            accumulator.push(&aligned)?;
            frame_indices.push(index);
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        Ok((accumulator.finish()?, frame_indices))
    })
}

fn normalize(
    trajectory: &DisplacementTrajectory,
    reporter: &ProgressReporter,
) -> Result<(DMatrix<f64>, DMatrix<f64>), DccmError> {
    let covariance = reporter.phase("Computing Covariance", || covariance_matrix(trajectory))?;
    let correlation = reporter.phase("Normalizing", || correlation_matrix(&covariance))?;
    Ok((covariance, correlation))
}
