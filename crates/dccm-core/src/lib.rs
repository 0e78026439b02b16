//! # DCCM Core Library
//!
//! Dynamic cross-correlation analysis of molecular dynamics trajectories.
//! For every pair of selected atoms the library measures how their positional
//! fluctuations move together, from +1 (in lockstep) through 0 (independent)
//! to -1 (in opposition).
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Topology`,
//!   `Trajectory`), the atom selection language, element masses, and PDB and
//!   matrix I/O.
//!
//! - **[`engine`]: The Logic Core.** Rigid-body superposition, the
//!   displacement accumulator, and the covariance and correlation stages,
//!   together with configuration, progress reporting and the shared error type.
//!
//! - **[`workflows`]: The Public API.** [`workflows::dccm::run`] executes the
//!   whole pipeline for a topology, a frame source and a
//!   [`DccmConfig`](engine::config::DccmConfig).

pub mod core;
pub mod engine;
pub mod workflows;
