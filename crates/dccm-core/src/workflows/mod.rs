//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) data models and
//! the [`engine`](crate::engine) stages into a complete analysis.
//!
//! - **DCCM Workflow** ([`dccm`]) - Selection, alignment, accumulation and
//!   normalization of a trajectory into a dynamic cross-correlation matrix.
//!   [`dccm::run`] drives a whole topology and frame source from a
//!   [`DccmConfig`](crate::engine::config::DccmConfig); [`dccm::compute`] runs
//!   the same pipeline on coordinate sets the caller has already selected.

pub mod dccm;
