//! Lights

#[macro_use]
extern crate log;

mod point;
mod sphere;

// Re-export.
pub use point::*;
pub use sphere::*;
