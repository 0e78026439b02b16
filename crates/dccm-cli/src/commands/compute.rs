use crate::cli::ComputeArgs;
use crate::commands::load_inputs;
use crate::config::PartialDccmConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dccm::{
    core::io::matrix::write_matrix_csv,
    engine::progress::ProgressReporter,
    workflows::{self, dccm::DccmResult},
};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

pub fn run(args: ComputeArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialDccmConfig::from_file(path)?,
        None => PartialDccmConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let (topology, trajectory) = load_inputs(&args.topology, args.trajectory.as_deref())?;
    info!(
        n_atoms = topology.len(),
        n_frames = trajectory.len(),
        "Inputs loaded."
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Computing DCCM for selection '{}' over {} frame(s)...",
        config.selection,
        config.frames.count(trajectory.len())
    );
    let result = workflows::dccm::run(&topology, &trajectory, &config, &reporter)?;

    let labels = topology.labels_of(&result.atom_indices);
    write_matrix(&args.output, &result.correlation, &labels)?;
    println!(
        "✓ Correlation matrix ({0}x{0}) written to: {1}",
        result.n_atoms(),
        args.output.display()
    );

    if let Some(path) = &args.covariance {
        write_matrix(path, &result.covariance, &labels)?;
        println!("✓ Covariance matrix written to: {}", path.display());
    }

    print_summary(&result, &labels);
    Ok(())
}

fn write_matrix(path: &Path, matrix: &DMatrix<f64>, labels: &[String]) -> Result<()> {
    info!("Writing matrix to {:?}", path);
    let writer = BufWriter::new(File::create(path)?);
    write_matrix_csv(matrix, labels, writer).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

type Pair = (usize, usize, f64);

/// The most correlated and most anti-correlated distinct atom pairs.
fn extreme_pairs(correlation: &DMatrix<f64>) -> Option<(Pair, Pair)> {
    let n = correlation.nrows();
    let mut pairs = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j)));
    let (i0, j0) = pairs.next()?;
    let first = (i0, j0, correlation[(i0, j0)]);

    Some(pairs.fold((first, first), |(max, min), (i, j)| {
        let value = correlation[(i, j)];
        (
            if value > max.2 { (i, j, value) } else { max },
            if value < min.2 { (i, j, value) } else { min },
        )
    }))
}

fn print_summary(result: &DccmResult, labels: &[String]) {
    println!(
        "  Atoms: {}  Frames: {}",
        result.n_atoms(),
        result.n_frames()
    );
    if let Some(((pi, pj, pv), (ni, nj, nv))) = extreme_pairs(&result.correlation) {
        println!(
            "  Strongest correlation:      {} / {} ({:+.3})",
            labels[pi], labels[pj], pv
        );
        println!(
            "  Strongest anti-correlation: {} / {} ({:+.3})",
            labels[ni], labels[nj], nv
        );
    }
}
