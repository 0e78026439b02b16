//! # Core Models Module
//!
//! Plain data structures describing what a trajectory is made of.
//!
//! - [`atom`] - Atom identity: names, residue membership, element and mass
//! - [`topology`] - The ordered atom list shared by every frame
//! - [`trajectory`] - An in-memory sequence of coordinate frames
//!
//! [`atom::Atom`] carries no coordinates. Frames are plain `[Point3<f64>]`
//! slices in topology order.
//!
//! ```ignore
//! use dccm::core::models::{atom::Atom, topology::Topology, trajectory::Trajectory};
//! use nalgebra::Point3;
//!
//! let topology = Topology::from_atoms(vec![
//!     Atom::new(1, "CA", "ALA", 1, 'A'),
//!     Atom::new(2, "CA", "GLY", 2, 'A'),
//! ]);
//! let trajectory = Trajectory::from_frames(vec![
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.8, 0.0, 0.0)],
//! ]);
//! ```

pub mod atom;
pub mod topology;
pub mod trajectory;
