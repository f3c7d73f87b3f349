//! Spherical Area Light

use crate::PointLight;
use photon_core::geometry::*;
use photon_core::rng::RNG;
use photon_core::spectrum::*;

/// A spherical area light represented by a bundle of point lights scattered
/// through its volume. The total power is shared evenly by the samples.
#[derive(Clone, Debug)]
pub struct LightSphere {
    /// Centre.
    center: Point3f,

    /// Radius.
    radius: Float,

    /// Ambient colour.
    ambient: Spectrum,

    /// Diffuse colour.
    diffuse: Spectrum,

    /// Specular colour.
    specular: Spectrum,

    /// Total power.
    power: Float,

    /// The point light samples.
    point_lights: Vec<PointLight>,
}

impl LightSphere {
    /// Returns a new `LightSphere` with `n_samples` point lights placed
    /// uniformly inside the sphere.
    ///
    /// * `center`    - Centre.
    /// * `radius`    - Radius.
    /// * `n_samples` - Number of point lights.
    /// * `ambient`   - Ambient colour.
    /// * `diffuse`   - Diffuse colour.
    /// * `specular`  - Specular colour.
    /// * `power`     - Total power.
    /// * `rng`       - Random number generator used to place the samples.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        center: Point3f,
        radius: Float,
        n_samples: usize,
        ambient: Spectrum,
        diffuse: Spectrum,
        specular: Spectrum,
        power: Float,
        rng: &mut RNG,
    ) -> Self {
        assert!(n_samples > 0, "a light sphere needs at least one sample");
        assert!(radius >= 0.0, "negative light radius {radius}");

        let sample_power = power / n_samples as Float;
        let point_lights: Vec<PointLight> = (0..n_samples)
            .map(|_| {
                let p = center + rng.uniform_in_ball() * radius;
                PointLight::new(p, ambient, diffuse, specular, sample_power)
            })
            .collect();
        debug!("Light sphere at {center:?} with {n_samples} samples of power {sample_power}");

        Self {
            center,
            radius,
            ambient,
            diffuse,
            specular,
            power,
            point_lights,
        }
    }

    /// Returns the centre.
    pub fn center(&self) -> Point3f {
        self.center
    }

    /// Returns the radius.
    pub fn radius(&self) -> Float {
        self.radius
    }

    /// Returns the ambient colour.
    pub fn ambient(&self) -> Spectrum {
        self.ambient
    }

    /// Returns the diffuse colour.
    pub fn diffuse(&self) -> Spectrum {
        self.diffuse
    }

    /// Returns the specular colour.
    pub fn specular(&self) -> Spectrum {
        self.specular
    }

    /// Returns the total power.
    pub fn power(&self) -> Float {
        self.power
    }

    /// Returns the point light samples.
    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Returns `true` if `p` lies inside the sphere.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point3f) -> bool {
        p.distance(&self.center) <= self.radius
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn light(n_samples: usize, seed: u64) -> LightSphere {
        LightSphere::new(
            Point3f::new(0.0, -0.4, -0.9),
            0.05,
            n_samples,
            Spectrum::ZERO,
            Spectrum::rgb(1.0, 1.0, 0.9),
            Spectrum::rgb(1.0, 1.0, 0.9),
            30.0,
            &mut RNG::new(seed),
        )
    }

    #[test]
    fn power_is_shared_evenly() {
        let ls = light(50, 0);
        assert_eq!(ls.point_lights().len(), 50);
        let total: Float = ls.point_lights().iter().map(|l| l.power).sum();
        assert!(approx_eq!(f32, total, 30.0, epsilon = 0.001));
        assert!(ls.point_lights().iter().all(|l| l.power == 0.6));
    }

    #[test]
    fn samples_inherit_colours() {
        let ls = light(3, 1);
        for l in ls.point_lights() {
            assert_eq!(l.diffuse, ls.diffuse());
            assert_eq!(l.specular, ls.specular());
            assert_eq!(l.ambient, ls.ambient());
        }
    }

    #[test]
    #[should_panic]
    fn no_samples() {
        light(0, 0);
    }

    proptest! {
        #[test]
        fn samples_lie_inside(seed in 0..1000u64, n in 1..20usize) {
            let ls = light(n, seed);
            for l in ls.point_lights() {
                prop_assert!(l.p_light.distance(&ls.center()) <= ls.radius() + 1e-6);
            }
        }
    }
}
