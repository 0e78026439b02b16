use crate::core::selection::AtomSelection;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_SELECTION: &str = "name CA";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    #[default]
    Mass,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMethod {
    #[default]
    Kabsch,
    None,
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Weighting::Mass => "mass",
            Weighting::Uniform => "uniform",
        })
    }
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlignmentMethod::Kabsch => "kabsch",
            AlignmentMethod::None => "none",
        })
    }
}

/// A half-open, strided range of frame indices: `start..stop` every `stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub stop: Option<usize>,
    pub stride: usize,
}

impl Default for FrameRange {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            stride: 1,
        }
    }
}

impl FrameRange {
    pub fn new(start: usize, stop: Option<usize>, stride: usize) -> Result<Self, ConfigError> {
        if stride == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "stride",
                reason: "must be at least 1".into(),
            });
        }
        if let Some(stop) = stop {
            if stop < start {
                return Err(ConfigError::InvalidValue {
                    parameter: "stop",
                    reason: format!("{} is before start {}", stop, start),
                });
            }
        }
        Ok(Self {
            start,
            stop,
            stride,
        })
    }

    // `stop` is clamped to the trajectory length.
    pub fn indices(&self, n_frames: usize) -> impl Iterator<Item = usize> + use<> {
        let stop = self.stop.map_or(n_frames, |s| s.min(n_frames));
        (self.start.min(stop)..stop).step_by(self.stride.max(1))
    }

    pub fn count(&self, n_frames: usize) -> usize {
        self.indices(n_frames).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DccmConfig {
    pub selection: AtomSelection,
    // Defaults to `selection`.
    pub fit_selection: Option<AtomSelection>,
    pub frames: FrameRange,
    pub reference_frame: usize,
    pub weighting: Weighting,
    pub alignment: AlignmentMethod,
}

impl DccmConfig {
    pub fn fit_selection(&self) -> &AtomSelection {
        self.fit_selection.as_ref().unwrap_or(&self.selection)
    }
}

#[derive(Default)]
pub struct DccmConfigBuilder {
    selection: Option<String>,
    fit_selection: Option<String>,
    start: Option<usize>,
    stop: Option<usize>,
    stride: Option<usize>,
    reference_frame: Option<usize>,
    weighting: Option<Weighting>,
    alignment: Option<AlignmentMethod>,
}

impl DccmConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, expr: impl Into<String>) -> Self {
        self.selection = Some(expr.into());
        self
    }
    pub fn fit_selection(mut self, expr: impl Into<String>) -> Self {
        self.fit_selection = Some(expr.into());
        self
    }
    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }
    pub fn stop(mut self, stop: usize) -> Self {
        self.stop = Some(stop);
        self
    }
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }
    pub fn reference_frame(mut self, index: usize) -> Self {
        self.reference_frame = Some(index);
        self
    }
    pub fn weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = Some(weighting);
        self
    }
    pub fn alignment(mut self, alignment: AlignmentMethod) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn build(self) -> Result<DccmConfig, ConfigError> {
        let parse = |parameter: &'static str, expr: &str| {
            AtomSelection::parse(expr).map_err(|e| ConfigError::InvalidValue {
                parameter,
                reason: e.to_string(),
            })
        };

        let selection = parse(
            "selection",
            self.selection.as_deref().unwrap_or(DEFAULT_SELECTION),
        )?;
        let fit_selection = self
            .fit_selection
            .as_deref()
            .map(|expr| parse("fit_selection", expr))
            .transpose()?;
        let frames = FrameRange::new(
            self.start.unwrap_or(0),
            self.stop,
            self.stride.unwrap_or(1),
        )?;

        Ok(DccmConfig {
            selection,
            fit_selection,
            frames,
            reference_frame: self.reference_frame.unwrap_or(0),
            weighting: self.weighting.unwrap_or_default(),
            alignment: self.alignment.unwrap_or_default(),
        })
    }
}
