//! Reading structures and trajectories, and writing result matrices.
//!
//! - [`traits`] - The [`StructureFile`](traits::StructureFile) reading interface
//! - [`pdb`] - Multi-model PDB files as topology plus frames
//! - [`matrix`] - CSV serialization of labelled square matrices

pub mod matrix;
pub mod pdb;
pub mod traits;
