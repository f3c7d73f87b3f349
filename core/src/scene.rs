//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::material::*;
use crate::shapes::*;

/// An immutable scene description: the shapes and the materials they use.
#[derive(Clone, Debug)]
pub struct Scene {
    /// All shapes in the scene.
    pub shapes: Vec<Shape>,

    /// Material table indexed by `Shape::material()`.
    pub materials: Vec<Material>,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `shapes`    - All shapes in the scene.
    /// * `materials` - Material table indexed by the shapes.
    pub fn new(shapes: Vec<Shape>, materials: Vec<Material>) -> Self {
        for (i, shape) in shapes.iter().enumerate() {
            assert!(
                shape.material() < materials.len(),
                "shape {i} uses material {} but only {} are defined",
                shape.material(),
                materials.len()
            );
        }
        debug!("Scene has {} shapes and {} materials", shapes.len(), materials.len());
        Self { shapes, materials }
    }

    /// Traces the ray into the scene and returns the nearest forward
    /// `Intersection`, if any.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let mut t_max = ray.t_max;
        let mut nearest: Option<(usize, ShapeHit)> = None;
        for (i, shape) in self.shapes.iter().enumerate() {
            let r = Ray { t_max, ..*ray };
            if let Some(hit) = shape.intersect(&r) {
                t_max = hit.0;
                nearest = Some((i, hit));
            }
        }
        nearest.map(|(i, (t, n))| Intersection::new(ray.at(t), t, n, i))
    }

    /// Returns the material of the shape that was hit.
    ///
    /// * `isect` - The intersection.
    pub fn material(&self, isect: &Intersection) -> &Material {
        &self.materials[self.shapes[isect.shape_index].material()]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::*;
    use float_cmp::*;

    fn two_spheres() -> Scene {
        Scene::new(
            vec![
                Sphere::new(Point3f::new(0.0, 0.0, 10.0), 1.0, 0).into(),
                Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, 1).into(),
            ],
            vec![
                Material::matte(Spectrum::new(0.2), 0.5),
                Material::matte(Spectrum::new(0.7), 0.5),
            ],
        )
    }

    #[test]
    fn nearest_hit_wins() {
        let scene = two_spheres();
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0));
        let isect = scene.intersect(&ray).unwrap();
        assert_eq!(isect.shape_index, 1);
        assert!(approx_eq!(f32, isect.t, 4.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, isect.p.z, 4.0, epsilon = 0.0001));
        assert_eq!(scene.material(&isect).diffuse, Spectrum::new(0.7));
    }

    #[test]
    fn miss_returns_none() {
        let scene = two_spheres();
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 1.0, 0.0));
        assert!(scene.intersect(&ray).is_none());
    }

    #[test]
    #[should_panic]
    fn material_out_of_range() {
        Scene::new(vec![Sphere::new(Point3f::zero(), 1.0, 3).into()], vec![Material::default()]);
    }
}
