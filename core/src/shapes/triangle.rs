//! Triangles

use super::ShapeHit;
use crate::geometry::*;

/// A single-sided-normal triangle.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertices.
    pub v: [Point3f; 3],

    /// Unit normal.
    pub n: Normal3f,

    /// Material index in the scene.
    pub material: usize,
}

impl Triangle {
    /// Create a new triangle. The normal follows the right-hand rule over
    /// the vertex order.
    ///
    /// * `v0`       - First vertex.
    /// * `v1`       - Second vertex.
    /// * `v2`       - Third vertex.
    /// * `material` - Material index in the scene.
    pub fn new(v0: Point3f, v1: Point3f, v2: Point3f, material: usize) -> Self {
        let n = Normal3f::from((v1 - v0).cross(&(v2 - v0)).normalize());
        Self { v: [v0, v1, v2], n, material }
    }

    /// Returns the triangle with its normal flipped, if needed, so it points
    /// towards the given point.
    ///
    /// * `p` - The point to face.
    pub fn facing(mut self, p: Point3f) -> Self {
        self.n = self.n.face_forward(&(p - self.v[0]));
        self
    }

    /// Returns the triangle with its normal flipped, if needed, so it points
    /// away from the given point.
    ///
    /// * `p` - The point to face away from.
    pub fn facing_away(mut self, p: Point3f) -> Self {
        self.n = self.n.face_forward(&(self.v[0] - p));
        self
    }

    /// Returns the nearest hit along the ray, if any.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let e1 = self.v[1] - self.v[0];
        let e2 = self.v[2] - self.v[0];

        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-10 {
            return None;
        }
        let inv_det = 1.0 / det;

        // Barycentric coordinates.
        let tvec = ray.o - self.v[0];
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = ray.d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t <= 0.0 || t >= ray.t_max {
            return None;
        }
        Some((t, self.n))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn floor() -> Triangle {
        Triangle::new(
            Point3f::new(-1.0, 0.0, -1.0),
            Point3f::new(1.0, 0.0, -1.0),
            Point3f::new(0.0, 0.0, 1.0),
            0,
        )
    }

    #[test]
    fn hit_inside() {
        let ray = Ray::new(Point3f::new(0.0, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        let (t, _) = floor().intersect(&ray).unwrap();
        assert!(approx_eq!(f32, t, 2.0, epsilon = 0.0001));
    }

    #[test]
    fn miss_outside_edges() {
        let ray = Ray::new(Point3f::new(2.0, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert!(floor().intersect(&ray).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(floor().intersect(&ray).is_none());
    }

    #[test]
    fn orientation() {
        let up = Point3f::new(0.0, 5.0, 0.0);
        assert!(floor().facing(up).n.y > 0.0);
        assert!(floor().facing_away(up).n.y < 0.0);
    }
}
