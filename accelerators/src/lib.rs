//! Spatial indexes over photons.

#[macro_use]
extern crate log;

mod kd_tree;

// Re-export
pub use kd_tree::*;
