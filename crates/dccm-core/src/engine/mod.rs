//! # Engine Module
//!
//! The numerical core of the DCCM pipeline: superposition, displacement
//! accumulation, covariance and correlation.
//!
//! ## Architecture
//!
//! - **Frame Access** ([`source`]) - The [`source::FrameSource`] trait and frame sampling
//! - **Alignment** ([`align`]) - Rigid-body superposition onto a reference frame
//! - **Accumulation** ([`accumulator`]) - Collects aligned frames into an F×N trajectory
//! - **Covariance** ([`covariance`]) - Per-axis-averaged atom-pair covariance
//! - **Correlation** ([`correlation`]) - Normalization to the DCCM
//! - **Configuration** ([`config`]) - Run parameters and their builder
//! - **Progress Monitoring** ([`progress`]) - Phase and task callbacks
//! - **Error Handling** ([`error`]) - The [`error::DccmError`] type shared by every stage
//!
//! Each stage is a plain function or a small value type; the
//! [`workflows`](crate::workflows) layer wires them together.

pub mod accumulator;
pub mod align;
pub mod config;
pub mod correlation;
pub mod covariance;
pub mod error;
pub mod progress;
pub mod source;
