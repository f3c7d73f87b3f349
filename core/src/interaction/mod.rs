//! Interactions

use crate::geometry::*;

/// The nearest forward hit of a ray against the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// Hit position.
    pub p: Point3f,

    /// Distance along the ray; never negative.
    pub t: Float,

    /// Unit surface normal; outward for closed shapes.
    pub n: Normal3f,

    /// Index of the hit shape in the scene.
    pub shape_index: usize,
}

impl Intersection {
    /// Returns a new `Intersection`.
    ///
    /// * `p`           - Hit position.
    /// * `t`           - Distance along the ray.
    /// * `n`           - Surface normal.
    /// * `shape_index` - Index of the hit shape.
    pub fn new(p: Point3f, t: Float, n: Normal3f, shape_index: usize) -> Self {
        assert!(t >= 0.0, "negative intersection distance {t}");
        Self { p, t, n, shape_index }
    }
}
