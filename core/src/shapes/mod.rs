//! Shapes

mod sphere;
mod triangle;

use crate::geometry::*;

// Re-export
pub use sphere::*;
pub use triangle::*;

/// A ray parameter and surface normal at a hit.
pub type ShapeHit = (Float, Normal3f);

/// The closed set of primitives a scene is built from.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl Shape {
    /// Returns the nearest hit along the ray with 0 < t < `ray.t_max`.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        match self {
            Self::Sphere(s) => s.intersect(ray),
            Self::Triangle(t) => t.intersect(ray),
        }
    }

    /// Returns the index of the shape's material in the scene.
    pub fn material(&self) -> usize {
        match self {
            Self::Sphere(s) => s.material,
            Self::Triangle(t) => t.material,
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Self::Triangle(t)
    }
}
