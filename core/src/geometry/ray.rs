//! Rays

use super::{Float, Point3f, Vector3f, INFINITY, RAY_EPSILON};

/// A semi-infinite line with an origin and a direction.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,
}

impl Ray {
    /// Returns an unbounded ray.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self { o, d, t_max: INFINITY }
    }

    /// Returns a ray leaving a surface point, with its origin nudged along
    /// the direction so it does not hit the same surface again.
    ///
    /// * `p` - Point on the surface.
    /// * `d` - Unit direction.
    pub fn spawn(p: Point3f, d: Vector3f) -> Self {
        Self::new(p + d * RAY_EPSILON, d)
    }

    /// Returns the position along the ray at a given parameter.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}
