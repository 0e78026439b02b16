pub mod compute;
pub mod inspect;

use crate::error::{CliError, Result};
use dccm::core::io::{pdb::PdbFile, traits::StructureFile};
use dccm::core::models::{topology::Topology, trajectory::Trajectory};
use dccm::engine::error::DccmError;
use std::path::Path;
use tracing::info;

/// Reads the topology file and the frames to analyze.
///
/// Without a separate trajectory the models of the topology file are the
/// frames; otherwise the trajectory must list the same number of atoms.
pub(crate) fn load_inputs(
    topology_path: &Path,
    trajectory_path: Option<&Path>,
) -> Result<(Topology, Trajectory)> {
    info!("Loading topology from {:?}", topology_path);
    let (topology, own_frames) = read_pdb(topology_path)?;

    let Some(trajectory_path) = trajectory_path else {
        return Ok((topology, own_frames));
    };

    info!("Loading trajectory from {:?}", trajectory_path);
    let (_, trajectory) = read_pdb(trajectory_path)?;
    if trajectory.n_atoms() != topology.len() {
        return Err(CliError::Core(DccmError::ShapeMismatch {
            expected: topology.len(),
            found: trajectory.n_atoms(),
            frame: None,
        }));
    }
    Ok((topology, trajectory))
}

fn read_pdb(path: &Path) -> Result<(Topology, Trajectory)> {
    PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
