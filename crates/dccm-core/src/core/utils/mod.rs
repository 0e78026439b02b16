pub mod geometry;
pub mod masses;
