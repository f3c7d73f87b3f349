//! Spheres

use super::ShapeHit;
use crate::geometry::*;

/// A sphere.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Centre.
    pub center: Point3f,

    /// Radius.
    pub radius: Float,

    /// Material index in the scene.
    pub material: usize,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`   - Centre.
    /// * `radius`   - Radius.
    /// * `material` - Material index in the scene.
    pub fn new(center: Point3f, radius: Float, material: usize) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive");
        Self { center, radius, material }
    }

    /// Returns the nearest hit along the ray, if any. The normal points out
    /// of the sphere even when the ray starts inside it.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let oc = ray.o - self.center;

        // Compute quadratic sphere coefficients.
        let a = ray.d.length_squared();
        let b = 2.0 * ray.d.dot(&oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Solve quadratic equation for t values.
        let (t0, t1) = solve_quadratic(a, b, c)?;
        if t0 >= ray.t_max || t1 <= 0.0 {
            return None;
        }

        let t = if t0 > 0.0 { t0 } else { t1 };
        if t >= ray.t_max {
            return None;
        }

        let n = Normal3f::from((ray.at(t) - self.center) / self.radius);
        Some((t, n))
    }
}

/// Returns the real roots of a·t² + b·t + c in ascending order.
///
/// * `a` - Quadratic coefficient.
/// * `b` - Linear coefficient.
/// * `c` - Constant.
fn solve_quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    // Avoid cancellation in the smaller root.
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let mut t0 = q / a;
    let mut t1 = if q != 0.0 { c / q } else { t0 };
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    Some((t0, t1))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::unit_vector3_f32;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn hit_from_outside() {
        let s = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, 0);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0));
        let (t, n) = s.intersect(&ray).unwrap();
        assert!(approx_eq!(f32, t, 4.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, n.z, -1.0, epsilon = 0.0001));
    }

    #[test]
    fn miss() {
        let s = Sphere::new(Point3f::new(0.0, 3.0, 5.0), 1.0, 0);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0));
        assert!(s.intersect(&ray).is_none());
    }

    #[test]
    fn behind_the_ray_is_not_hit() {
        let s = Sphere::new(Point3f::new(0.0, 0.0, -5.0), 1.0, 0);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0));
        assert!(s.intersect(&ray).is_none());
    }

    proptest! {
        #[test]
        fn from_inside_hits_far_side(d in unit_vector3_f32()) {
            let s = Sphere::new(Point3f::zero(), 2.0, 0);
            let (t, n) = s.intersect(&Ray::new(Point3f::zero(), d)).unwrap();
            prop_assert!(approx_eq!(f32, t, 2.0, epsilon = 0.001));
            prop_assert!(n.dot(&d) > 0.99);
        }
    }
}
