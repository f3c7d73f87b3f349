//! Specular reflection and transmission

mod common;
mod fresnel;

// Re-export
pub use common::*;
pub use fresnel::*;
