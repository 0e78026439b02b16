use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::topology::Topology;
use crate::core::models::trajectory::Trajectory;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coord(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    match value.parse::<f64>() {
        Ok(coord) if coord.is_finite() => Ok(coord),
        _ => Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: format!("{}-{}", start + 1, end),
                value: value.into(),
            },
        }),
    }
}

/// Reader for (multi-model) Protein Data Bank files.
///
/// The first model defines the topology; every `MODEL`/`ENDMDL` block
/// becomes one frame and must list the same number of atoms. A file without
/// `MODEL` records is read as a single frame.
pub struct PdbFile;

impl PdbFile {
    fn finish_frame(
        frames: &mut Vec<Vec<Point3<f64>>>,
        current: &mut Vec<Point3<f64>>,
        topology: &Topology,
        line_num: usize,
    ) -> Result<(), PdbError> {
        if current.is_empty() {
            return Ok(());
        }
        if current.len() != topology.len() {
            return Err(PdbError::Inconsistency(format!(
                "Model ending at line {} has {} atoms, but the first model has {}",
                line_num,
                current.len(),
                topology.len()
            )));
        }
        frames.push(std::mem::take(current));
        Ok(())
    }

    fn parse_atom(
        line: &str,
        line_num: usize,
        fallback_serial: usize,
    ) -> Result<Atom, PdbError> {
        let serial_str = slice_and_trim(line, 6, 11);
        let name_str = slice_and_trim(line, 12, 16);
        let res_name_str = slice_and_trim(line, 17, 20);
        let chain_id_str = slice_and_trim(line, 21, 22);
        let res_seq_str = slice_and_trim(line, 22, 26);
        let element_str = slice_and_trim(line, 76, 78);

        if name_str.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField {
                    columns: "13-16".into(),
                },
            });
        }

        // Serials overflow five columns in large systems; keep counting.
        let serial = serial_str.parse().unwrap_or(fallback_serial);
        let chain_id = chain_id_str.chars().next().unwrap_or(' ');
        let residue_number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_seq_str.into(),
            },
        })?;

        let atom = Atom::new(serial, name_str, res_name_str, residue_number, chain_id);
        Ok(if element_str.is_empty() {
            atom
        } else {
            atom.with_element(element_str)
        })
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Topology, Trajectory), Self::Error> {
        let mut topology = Topology::new();
        let mut frames: Vec<Vec<Point3<f64>>> = Vec::new();
        let mut current: Vec<Point3<f64>> = Vec::new();
        let mut last_line = 0;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            last_line = line_num;

            match slice_and_trim(&line, 0, 6) {
                "MODEL" => {
                    Self::finish_frame(&mut frames, &mut current, &topology, line_num)?;
                }
                "ENDMDL" => {
                    Self::finish_frame(&mut frames, &mut current, &topology, line_num)?;
                }
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    let position = Point3::new(
                        parse_coord(&line, line_num, 30, 38)?,
                        parse_coord(&line, line_num, 38, 46)?,
                        parse_coord(&line, line_num, 46, 54)?,
                    );
                    if frames.is_empty() {
                        let atom = Self::parse_atom(&line, line_num, topology.len() + 1)?;
                        topology.push(atom);
                    } else if current.len() >= topology.len() {
                        return Err(PdbError::Inconsistency(format!(
                            "Model containing line {} has more atoms than the first model ({})",
                            line_num,
                            topology.len()
                        )));
                    }
                    current.push(position);
                }
                _ => {}
            }
        }
        Self::finish_frame(&mut frames, &mut current, &topology, last_line)?;

        if topology.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM".into()));
        }

        let trajectory = Trajectory::from_frames(frames).ok_or_else(|| {
            PdbError::Inconsistency("Models disagree on the number of atoms".into())
        })?;
        Ok((topology, trajectory))
    }
}
