//! # Core Module
//!
//! Stateless building blocks shared by the DCCM engine and its front ends.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, topologies and in-memory trajectories
//! - **Atom Selection** ([`selection`]) - A small expression language resolved against a topology
//! - **File I/O** ([`io`]) - PDB reading and CSV matrix output
//! - **Utilities** ([`utils`]) - Element masses and basic geometry
//!
//! Nothing in this module performs alignment or statistics; those live in
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
