use thiserror::Error;

use super::config::ConfigError;
use crate::core::selection::SelectionError;

#[derive(Debug, Error)]
pub enum DccmError {
    #[error("Atom count mismatch{}: expected {expected}, found {found}", frame_suffix(.frame))]
    ShapeMismatch {
        expected: usize,
        found: usize,
        frame: Option<usize>,
    },

    #[error("No frames were sampled from the trajectory")]
    EmptyTrajectory,

    #[error("At least 2 frames are required to compute fluctuations, got {frames}")]
    DegenerateTrajectory { frames: usize },

    #[error("Atom {atom} of the selection has zero positional variance")]
    ZeroVariance { atom: usize },

    #[error("Selection must contain at least 2 atoms, found {found}")]
    InsufficientAtoms { found: usize },

    #[error("Frame {index} is out of range for a trajectory with {available} frames")]
    FrameOutOfRange { index: usize, available: usize },

    #[error("Invalid atom selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Structural alignment failed: {0}")]
    Alignment(String),
}

fn frame_suffix(frame: &Option<usize>) -> String {
    frame.map(|f| format!(" in frame {}", f)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_mentions_frame_when_known() {
        let err = DccmError::ShapeMismatch {
            expected: 10,
            found: 9,
            frame: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "Atom count mismatch in frame 4: expected 10, found 9"
        );
    }

    #[test]
    fn shape_mismatch_without_frame_omits_it() {
        let err = DccmError::ShapeMismatch {
            expected: 10,
            found: 9,
            frame: None,
        };
        assert_eq!(err.to_string(), "Atom count mismatch: expected 10, found 9");
    }

    #[test]
    fn selection_errors_convert() {
        let err: DccmError = SelectionError::Empty.into();
        assert!(matches!(err, DccmError::Selection(SelectionError::Empty)));
    }
}
