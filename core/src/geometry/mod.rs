//! Geometry

mod common;
mod normal;
mod point3;
mod ray;
mod vector3;

// Re-export
pub use crate::pbrt::*;
pub use common::*;
pub use normal::*;
pub use point3::*;
pub use ray::*;
pub use vector3::*;

// ----------------------------------------------------------------------------
// Test strategies
// ----------------------------------------------------------------------------

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
prop_compose! {
    /// Generates vectors with components in [-100, 100).
    pub fn vector3_f32()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Vector3f {
        Vector3f::new(x, y, z)
    }
}

#[cfg(test)]
prop_compose! {
    /// Generates unit vectors by normalizing vectors bounded away from zero.
    pub fn unit_vector3_f32()(v in vector3_f32().prop_filter("non-zero", |v| v.length_squared() > 0.01)) -> Vector3f {
        v.normalize()
    }
}

#[cfg(test)]
prop_compose! {
    /// Generates points with coordinates in [-100, 100).
    pub fn point3_f32()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Point3f {
        Point3f::new(x, y, z)
    }
}
