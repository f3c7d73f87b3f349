//! Radiance Estimation

use photon_accelerators::KdPhotonTree;
use photon_core::camera::*;
use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::reflection::*;
use photon_core::scene::*;
use photon_core::spectrum::*;
use photon_lights::LightSphere;

/// Attenuation applied to light returned along a reflected or transmitted
/// ray.
pub const DAMPING: Float = 0.95;

/// Weight of the analytic highlight relative to the photon density estimate.
pub const SPECULAR_SCALE: Float = 10.0;

/// Gaussian filter constants.
const GAUSSIAN_ALPHA: Float = 0.918;
const GAUSSIAN_BETA: Float = 1.953;

/// Returns the Gaussian filter weight for a photon.
///
/// * `d_squared` - Squared distance from the query point to the photon.
/// * `r_squared` - Squared radius of the search disk.
pub fn gaussian_weight(d_squared: Float, r_squared: Float) -> Float {
    let numerator = 1.0 - (-GAUSSIAN_BETA * d_squared / (2.0 * r_squared)).exp();
    let denominator = 1.0 - (-GAUSSIAN_BETA).exp();
    GAUSSIAN_ALPHA * numerator / denominator
}

/// How a view ray continues from a specular surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceInteraction {
    Reflect,
    Transmit,
}

impl SurfaceInteraction {
    /// Returns the interaction a chain continues with at a surface, keeping
    /// to `self` when the material allows it. `None` for surfaces that
    /// neither reflect nor transmit.
    ///
    /// * `material` - The surface material.
    pub fn at(self, material: &Material) -> Option<Self> {
        match self {
            Self::Reflect if material.reflective => Some(Self::Reflect),
            Self::Transmit if material.transparent => Some(Self::Transmit),
            _ if material.reflective => Some(Self::Reflect),
            _ if material.transparent => Some(Self::Transmit),
            _ => None,
        }
    }

    /// Returns the direction the ray continues in.
    ///
    /// * `d`   - Unit incident direction.
    /// * `n`   - Surface normal.
    /// * `ior` - Index of refraction of the surface.
    fn direction(self, d: &Vector3f, n: &Normal3f, ior: Float) -> Vector3f {
        match self {
            Self::Reflect => reflect(d, n),
            Self::Transmit => transmit(d, n, ior),
        }
    }
}

/// Computes the light leaving a surface point towards the viewer from the
/// photon map, an analytic highlight and recursive specular chains.
pub struct RadianceEstimator<'a> {
    /// Deposited photons.
    photon_map: &'a KdPhotonTree,

    /// The scene.
    scene: &'a Scene,

    /// The area light.
    light: &'a LightSphere,

    /// The camera.
    camera: &'a Camera,

    /// Maximum photon search radius.
    max_radius: Float,

    /// Maximum depth of reflection and transmission chains.
    max_depth: usize,
}

impl<'a> RadianceEstimator<'a> {
    /// Create a new `RadianceEstimator`.
    ///
    /// * `photon_map` - Deposited photons.
    /// * `scene`      - The scene.
    /// * `light`      - The area light.
    /// * `camera`     - The camera.
    /// * `max_radius` - Maximum photon search radius.
    /// * `max_depth`  - Maximum depth of reflection and transmission chains.
    pub fn new(
        photon_map: &'a KdPhotonTree,
        scene: &'a Scene,
        light: &'a LightSphere,
        camera: &'a Camera,
        max_radius: Float,
        max_depth: usize,
    ) -> Self {
        Self {
            photon_map,
            scene,
            light,
            camera,
            max_radius,
            max_depth,
        }
    }

    /// Returns the radiance leaving a hit point back along the incident ray.
    ///
    /// * `n`     - Number of photons gathered per density estimate.
    /// * `isect` - The hit point.
    /// * `ray`   - The incident ray.
    pub fn estimate(&self, n: usize, isect: &Intersection, ray: &Ray) -> Spectrum {
        let material = self.scene.material(isect);

        match (material.reflective, material.transparent) {
            (true, true) => {
                let ratio = fresnel_ratio(&ray.d.normalize(), &isect.n, material.ior);
                let reflected = self.specular_estimate(SurfaceInteraction::Reflect, n, isect, ray, 0);
                if ratio >= 1.0 {
                    return reflected;
                }

                let refracted = self.specular_estimate(SurfaceInteraction::Transmit, n, isect, ray, 0);
                let local = self.local_estimate(n, isect);
                reflected * (ratio * material.reflect_ratio)
                    + refracted * (1.0 - ratio)
                    + local * (1.0 - material.reflect_ratio)
            }
            (true, false) => {
                let reflected = self.specular_estimate(SurfaceInteraction::Reflect, n, isect, ray, 0);
                let local = self.local_estimate(n, isect);
                reflected * material.reflect_ratio + local * (1.0 - material.reflect_ratio)
            }
            (false, true) => self.specular_estimate(SurfaceInteraction::Transmit, n, isect, ray, 0),
            (false, false) => self.local_estimate(n, isect),
        }
    }

    /// Follow a reflection or transmission chain from a hit point. At every
    /// surface that continues the chain the colour returned is blended with
    /// the local estimate of the next surface by its reflect ratio; a switch
    /// between reflection and transmission returns the new chain unblended.
    /// Every step is damped by `DAMPING`. Past `max_depth`, or when the ray
    /// leaves the scene, the chain returns black.
    ///
    /// * `kind`  - The kind of chain.
    /// * `n`     - Number of photons gathered per density estimate.
    /// * `isect` - The hit point.
    /// * `ray`   - The incident ray.
    /// * `depth` - Current depth.
    fn specular_estimate(
        &self,
        kind: SurfaceInteraction,
        n: usize,
        isect: &Intersection,
        ray: &Ray,
        depth: usize,
    ) -> Spectrum {
        if depth > self.max_depth {
            return Spectrum::ZERO;
        }

        let material = self.scene.material(isect);
        let interaction = match kind.at(material) {
            Some(interaction) => interaction,
            None if depth == 0 => return Spectrum::ZERO,
            None => return self.local_estimate(n, isect),
        };

        let d = interaction.direction(&ray.d.normalize(), &isect.n, material.ior).normalize();
        let next_ray = Ray::spawn(isect.p, d);
        let next = match self.scene.intersect(&next_ray) {
            Some(next) => next,
            None => return Spectrum::ZERO,
        };

        let colour = self.specular_estimate(interaction, n, &next, &next_ray, depth + 1);
        let colour = if interaction == kind {
            let reflect_ratio = self.scene.material(&next).reflect_ratio;
            colour * reflect_ratio + self.local_estimate(n, &next) * (1.0 - reflect_ratio)
        } else {
            colour
        };

        colour * DAMPING
    }

    /// Returns the local surface estimate: photon density, the scaled
    /// highlight and the ambient term.
    ///
    /// * `n`     - Number of photons gathered per density estimate.
    /// * `isect` - The hit point.
    pub fn local_estimate(&self, n: usize, isect: &Intersection) -> Spectrum {
        let material = self.scene.material(isect);
        self.density_estimate(n, isect)
            + self.highlight(isect) * SPECULAR_SCALE
            + material.ambient * self.light.ambient()
    }

    /// Returns the diffuse radiance from the `n` nearest photons, filtered
    /// with a Gaussian kernel over the disk reaching the farthest of them.
    ///
    /// * `n`     - Number of photons gathered.
    /// * `isect` - The hit point.
    pub fn density_estimate(&self, n: usize, isect: &Intersection) -> Spectrum {
        let photons = self.photon_map.find_nearest(&isect.p, self.max_radius, n);
        let r_squared = match photons.last() {
            Some(farthest) => farthest.p.distance_squared(&isect.p),
            None => return Spectrum::ZERO,
        };
        if r_squared <= 0.0 {
            return Spectrum::ZERO;
        }

        let diffuse = self.scene.material(isect).diffuse;
        let n_hat = Vector3f::from(isect.n);
        let sum = photons.iter().fold(Spectrum::ZERO, |sum, photon| {
            let cos_theta = max(0.0, -photon.d.dot(&n_hat));
            let w = gaussian_weight(photon.p.distance_squared(&isect.p), r_squared);
            sum + diffuse * photon.power * (cos_theta * w)
        });

        sum / (PI * r_squared)
    }

    /// Returns the Blinn-Phong highlight from the light's centre with inverse
    /// square falloff.
    ///
    /// * `isect` - The hit point.
    pub fn highlight(&self, isect: &Intersection) -> Spectrum {
        let material = self.scene.material(isect);
        if material.shininess == 0.0 {
            return Spectrum::ZERO;
        }

        let to_light = self.light.center() - isect.p;
        let r_squared = to_light.length_squared();
        assert!(r_squared >= 0.0, "negative distance to light");
        if r_squared == 0.0 {
            return Spectrum::ZERO;
        }

        let n_hat = Vector3f::from(isect.n);
        let r_hat = to_light.normalize();
        let cos_theta = clamp(r_hat.dot(&n_hat), 0.0, 1.0);
        if cos_theta == 0.0 {
            return Spectrum::ZERO;
        }

        let view = self.camera.direction_to(&isect.p);
        let half = (r_hat + view).normalize();
        let blinn = clamp(half.dot(&n_hat), 0.0, 1.0).powf(material.shininess);
        let attenuation = 1.0 / (FOUR_PI * r_squared);

        material.specular * self.light.specular() * (blinn * attenuation)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
