use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use dccm::engine::config::{AlignmentMethod, DccmConfig, DccmConfigBuilder, Weighting};
use dccm::engine::error::DccmError;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IntoDeserializer, value::StrDeserializer};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSelectionConfig {
    atoms: Option<String>,
    fit: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFramesConfig {
    start: Option<usize>,
    stop: Option<usize>,
    stride: Option<usize>,
    reference: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAlignmentConfig {
    method: Option<AlignmentMethod>,
    weighting: Option<Weighting>,
}

/// Configuration as read from a TOML file, with every field optional.
///
/// ```toml
/// [selection]
/// atoms = "name CA"
/// fit = "name CA and resid 5-120"
///
/// [frames]
/// start = 0
/// stride = 10
/// reference = 0
///
/// [alignment]
/// method = "kabsch"
/// weighting = "mass"
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDccmConfig {
    selection: Option<PartialSelectionConfig>,
    frames: Option<PartialFramesConfig>,
    alignment: Option<PartialAlignmentConfig>,
}

impl PartialDccmConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Layers command-line flags and then `--set` overrides on top of the
    /// file values and builds the final configuration.
    pub fn merge_with_cli(mut self, args: &ComputeArgs) -> Result<DccmConfig> {
        self.apply_cli_args(args);
        self.apply_set_values(&args.set_values)?;

        let selection = self.selection.unwrap_or_default();
        let frames = self.frames.unwrap_or_default();
        let alignment = self.alignment.unwrap_or_default();

        let mut builder = DccmConfigBuilder::new();
        if let Some(atoms) = selection.atoms {
            builder = builder.selection(atoms);
        }
        if let Some(fit) = selection.fit {
            builder = builder.fit_selection(fit);
        }
        if let Some(start) = frames.start {
            builder = builder.start(start);
        }
        if let Some(stop) = frames.stop {
            builder = builder.stop(stop);
        }
        if let Some(stride) = frames.stride {
            builder = builder.stride(stride);
        }
        if let Some(reference) = frames.reference {
            builder = builder.reference_frame(reference);
        }
        if let Some(method) = alignment.method {
            builder = builder.alignment(method);
        }
        if let Some(weighting) = alignment.weighting {
            builder = builder.weighting(weighting);
        }

        Ok(builder.build().map_err(DccmError::from)?)
    }

    fn apply_cli_args(&mut self, args: &ComputeArgs) {
        let selection = self.selection.get_or_insert_with(Default::default);
        if let Some(atoms) = &args.selection {
            selection.atoms = Some(atoms.clone());
        }
        if let Some(fit) = &args.fit_selection {
            selection.fit = Some(fit.clone());
        }

        let frames = self.frames.get_or_insert_with(Default::default);
        frames.start = args.start.or(frames.start);
        frames.stop = args.stop.or(frames.stop);
        frames.stride = args.stride.or(frames.stride);
        frames.reference = args.reference_frame.or(frames.reference);

        let alignment = self.alignment.get_or_insert_with(Default::default);
        if args.no_align {
            alignment.method = Some(AlignmentMethod::None);
        }
        if let Some(weighting) = args.weighting {
            alignment.weighting = Some(weighting.into());
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "selection.atoms" => {
                    self.selection.get_or_insert_with(Default::default).atoms =
                        Some(value_str.to_string());
                }
                "selection.fit" => {
                    self.selection.get_or_insert_with(Default::default).fit =
                        Some(value_str.to_string());
                }
                "frames.start" => {
                    self.frames.get_or_insert_with(Default::default).start =
                        Some(parse_number(key, value_str)?);
                }
                "frames.stop" => {
                    self.frames.get_or_insert_with(Default::default).stop =
                        Some(parse_number(key, value_str)?);
                }
                "frames.stride" => {
                    self.frames.get_or_insert_with(Default::default).stride =
                        Some(parse_number(key, value_str)?);
                }
                "frames.reference" => {
                    self.frames.get_or_insert_with(Default::default).reference =
                        Some(parse_number(key, value_str)?);
                }
                "alignment.method" => {
                    self.alignment.get_or_insert_with(Default::default).method =
                        Some(parse_keyword(key, value_str)?);
                }
                "alignment.weighting" => {
                    self.alignment.get_or_insert_with(Default::default).weighting =
                        Some(parse_keyword(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid integer value for {}: {}", key, value))
    })
}

/// Parses a config-file keyword such as `"uniform"` into its enum.
fn parse_keyword<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> =
        value.trim().into_deserializer();
    T::deserialize(deserializer)
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn compute_args(extra: &[&str]) -> ComputeArgs {
        let mut args = vec!["dccm", "compute", "top.pdb"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Compute(args) => args,
            _ => panic!("Expected 'compute' subcommand"),
        }
    }

    const FULL_CONFIG: &str = r#"
        [selection]
        atoms = "name CA and chain A"
        fit = "name CA"

        [frames]
        start = 10
        stop = 500
        stride = 5
        reference = 10

        [alignment]
        method = "kabsch"
        weighting = "uniform"
    "#;

    #[test]
    fn defaults_apply_without_config_file() {
        let config = PartialDccmConfig::default()
            .merge_with_cli(&compute_args(&[]))
            .unwrap();
        assert_eq!(config.selection.as_str(), "name CA");
        assert_eq!(config.frames.stride, 1);
        assert_eq!(config.reference_frame, 0);
        assert_eq!(config.weighting, Weighting::Mass);
        assert_eq!(config.alignment, AlignmentMethod::Kabsch);
    }

    #[test]
    fn load_from_file_populates_every_section() {
        let path = write_config_file("full.toml", FULL_CONFIG);
        let config = PartialDccmConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&compute_args(&[]))
            .unwrap();
        assert_eq!(config.selection.as_str(), "name CA and chain A");
        assert_eq!(config.fit_selection().as_str(), "name CA");
        assert_eq!(config.frames.start, 10);
        assert_eq!(config.frames.stop, Some(500));
        assert_eq!(config.frames.stride, 5);
        assert_eq!(config.reference_frame, 10);
        assert_eq!(config.weighting, Weighting::Uniform);
    }

    #[test]
    fn cli_args_override_file_values() {
        let path = write_config_file("override.toml", FULL_CONFIG);
        let args = compute_args(&[
            "--selection",
            "name CB",
            "--stride",
            "2",
            "--weighting",
            "mass",
            "--no-align",
        ]);
        let config = PartialDccmConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config.selection.as_str(), "name CB");
        assert_eq!(config.frames.stride, 2);
        assert_eq!(config.frames.start, 10);
        assert_eq!(config.weighting, Weighting::Mass);
        assert_eq!(config.alignment, AlignmentMethod::None);
    }

    #[test]
    fn set_values_override_cli_args() {
        let args = compute_args(&[
            "--stride",
            "2",
            "-S",
            "frames.stride=7",
            "-S",
            "alignment.weighting=uniform",
            "-S",
            "selection.atoms=name CA and resid 1-50",
        ]);
        let config = PartialDccmConfig::default().merge_with_cli(&args).unwrap();
        assert_eq!(config.frames.stride, 7);
        assert_eq!(config.weighting, Weighting::Uniform);
        assert_eq!(config.selection.as_str(), "name CA and resid 1-50");
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let path = write_config_file("unknown.toml", "[frames]\nstep = 3\n");
        let result = PartialDccmConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_set_values_are_config_errors() {
        for bad in ["frames.stride", "frames.stride=abc", "alignment.method=quaternion", "nope.key=1"] {
            let args = compute_args(&["-S", bad]);
            let result = PartialDccmConfig::default().merge_with_cli(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{}'", bad);
        }
    }

    #[test]
    fn builder_validation_surfaces_as_config_error() {
        let args = compute_args(&["--stride", "0"]);
        let result = PartialDccmConfig::default().merge_with_cli(&args);
        match result {
            Err(CliError::Core(err @ DccmError::Config(_))) => {
                assert!(err.to_string().contains("stride"))
            }
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}
