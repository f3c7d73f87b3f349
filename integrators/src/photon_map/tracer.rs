//! Photon Tracing

use super::PhotonMapSettings;
use photon_core::geometry::*;
use photon_core::integrator::create_progress_bar;
use photon_core::interaction::Intersection;
use photon_core::material::*;
use photon_core::photon::*;
use photon_core::reflection::*;
use photon_core::rng::RNG;
use photon_core::scene::*;
use photon_core::spectrum::*;
use photon_lights::LightSphere;
use std::thread;
use std::time::Instant;

/// Number of photons handed to a worker at a time. Each chunk draws from its
/// own random number stream.
pub const PHOTON_CHUNK_SIZE: usize = 1024;

/// Maximum number of directions tried for a photon that keeps missing the
/// scene before it is dropped.
pub const MAX_DIRECTION_RESAMPLES: usize = 1024;

/// Scale applied to the transmission coefficient to get the per-channel
/// transmission colour.
const TRANSMISSION_SCALE: Float = 0.75;

/// Tolerance on the scattering probabilities.
const PROBABILITY_TOLERANCE: Float = 1e-3;

/// Samples shorter than this are too close to the ball centre to give a
/// reliable direction.
const MIN_DIRECTION_LENGTH_SQUARED: Float = 1e-8;

/// Returns the random number stream for a given index under a seed.
///
/// * `seed`  - The seed.
/// * `index` - Stream index.
pub fn rng_stream(seed: u64, index: usize) -> RNG {
    RNG::new((seed << 32) ^ index as u64)
}

/// Returns a direction uniformly distributed over the sphere of directions.
///
/// * `rng` - Random number generator.
pub fn random_direction(rng: &mut RNG) -> Vector3f {
    loop {
        let v = rng.uniform_in_ball();
        if v.length_squared() > MIN_DIRECTION_LENGTH_SQUARED {
            return v.normalize();
        }
    }
}

/// Emit photons from the point lights making up an area light. The photons
/// are split evenly between the point lights with the remainder handed out
/// round-robin; each photon carries an equal share of its light's flux.
///
/// * `light` - The area light.
/// * `total` - Number of photons to emit.
/// * `rng`   - Random number generator for the directions.
pub fn generate_photons(light: &LightSphere, total: usize, rng: &mut RNG) -> Vec<Photon> {
    let point_lights = light.point_lights();
    let n_lights = point_lights.len();
    let mut photons = Vec::with_capacity(total);

    for (i, point_light) in point_lights.iter().enumerate() {
        let count = total / n_lights + usize::from(i < total % n_lights);
        if count == 0 {
            continue;
        }

        let power = point_light.flux() / count as Float;
        trace!("Point light {i} emits {count} photons");
        photons.extend((0..count).map(|_| Photon::new(point_light.p_light, random_direction(rng), power)));
    }

    debug!("Emitted {} photons from {} point lights", photons.len(), n_lights);
    photons
}

/// The way a photon leaves a surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scatter {
    Diffuse,
    Specular,
    Transmission,
}

/// Russian roulette probabilities for a photon hitting a material.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterProbabilities {
    /// Diffuse colour weighted by the diffuse coefficient.
    pub diffuse: Spectrum,

    /// Specular colour weighted by the specular coefficient.
    pub specular: Spectrum,

    /// Transmission colour weighted by the transmission coefficient.
    pub transmission: Spectrum,

    /// Probability of a diffuse bounce.
    pub pd: Float,

    /// Probability of a specular bounce.
    pub ps: Float,

    /// Probability of transmission.
    pub pt: Float,
}

impl ScatterProbabilities {
    /// Returns the probability of absorption.
    pub fn pa(&self) -> Float {
        1.0 - (self.pd + self.ps + self.pt)
    }

    /// Select the scattering event for a uniform random value in [0, 1).
    /// Returns `None` when the photon is absorbed.
    ///
    /// * `u` - Uniform random value.
    pub fn select(&self, u: Float) -> Option<Scatter> {
        if u < self.pd {
            Some(Scatter::Diffuse)
        } else if u < self.pd + self.ps {
            Some(Scatter::Specular)
        } else if u < self.pd + self.ps + self.pt {
            Some(Scatter::Transmission)
        } else {
            None
        }
    }
}

impl From<&Material> for ScatterProbabilities {
    /// Derive the probabilities from a material. The probability of the
    /// photon surviving is the largest channel of the summed weights; it is
    /// shared between the three events by their total weight.
    ///
    /// * `material` - The material.
    fn from(material: &Material) -> Self {
        let diffuse = material.diffuse * material.coef_diffuse;
        let specular = material.specular * material.coef_specular;
        let transmission = Spectrum::new(TRANSMISSION_SCALE * material.coef_transmission);

        let (sum_d, sum_s, sum_t) = (diffuse.sum(), specular.sum(), transmission.sum());
        let total = sum_d + sum_s + sum_t;
        let pr = (diffuse + specular + transmission).max_component_value();
        assert!(
            (0.0..=1.0 + PROBABILITY_TOLERANCE).contains(&pr),
            "survival probability {pr} out of range for {material:?}"
        );

        let (pd, ps, pt) = if total > 0.0 {
            (pr * sum_d / total, pr * sum_s / total, pr * sum_t / total)
        } else {
            (0.0, 0.0, 0.0)
        };
        assert!(
            (pr - (pd + ps + pt)).abs() < PROBABILITY_TOLERANCE,
            "scattering probabilities {pd} + {ps} + {pt} do not sum to {pr}"
        );

        Self {
            diffuse,
            specular,
            transmission,
            pd,
            ps,
            pt,
        }
    }
}

/// Follows photons through a scene with Russian roulette.
pub struct PhotonTracer<'a> {
    /// The scene.
    scene: &'a Scene,

    /// Maximum number of bounces per photon.
    max_bounces: usize,
}

impl<'a> PhotonTracer<'a> {
    /// Create a new `PhotonTracer`.
    ///
    /// * `scene`       - The scene.
    /// * `max_bounces` - Maximum number of bounces per photon.
    pub fn new(scene: &'a Scene, max_bounces: usize) -> Self {
        Self { scene, max_bounces }
    }

    /// Walk a photon through the scene until it is absorbed, recording a copy
    /// at every hit on a surface that can absorb it.
    ///
    /// * `photon`   - The emitted photon.
    /// * `rng`      - Random number generator.
    /// * `deposits` - Recorded photons.
    pub fn trace_photon(&self, mut photon: Photon, rng: &mut RNG, deposits: &mut Vec<Photon>) {
        let mut ray = photon.ray();

        for _ in 0..self.max_bounces {
            let isect = match self.find_hit(&mut photon, &mut ray, rng) {
                Some(isect) => isect,
                None => {
                    warn!(
                        "Dropping photon at {:?} after {} missed directions",
                        photon.p, MAX_DIRECTION_RESAMPLES
                    );
                    return;
                }
            };

            photon.p = isect.p;
            let material = self.scene.material(&isect);
            let probabilities = ScatterProbabilities::from(material);

            let u = rng.uniform_float();
            if !material.transparent && u > material.reflect_ratio {
                deposits.push(photon);
            }

            let (d, scale) = match probabilities.select(u) {
                Some(Scatter::Diffuse) => (reflect(&photon.d, &isect.n), probabilities.diffuse / probabilities.pd),
                Some(Scatter::Specular) => (reflect(&photon.d, &isect.n), probabilities.specular / probabilities.ps),
                Some(Scatter::Transmission) => (
                    transmit(&photon.d, &isect.n, material.ior),
                    probabilities.transmission / probabilities.pt,
                ),
                None => return,
            };

            photon.d = d.normalize();
            photon.power *= scale;
            debug_assert!(!photon.power.has_nans(), "photon power became NaN at {:?}", photon.p);

            ray = Ray::spawn(photon.p, photon.d);
        }

        trace!("Photon at {:?} reached {} bounces", photon.p, self.max_bounces);
    }

    /// Returns the next surface hit along the photon's path. A photon that
    /// leaves the scene is sent off in a new random direction from where it
    /// is; gives up after `MAX_DIRECTION_RESAMPLES` tries.
    ///
    /// * `photon` - The photon.
    /// * `ray`    - The ray the photon travels along.
    /// * `rng`    - Random number generator.
    fn find_hit(&self, photon: &mut Photon, ray: &mut Ray, rng: &mut RNG) -> Option<Intersection> {
        for _ in 0..MAX_DIRECTION_RESAMPLES {
            if let Some(isect) = self.scene.intersect(ray) {
                return Some(isect);
            }
            photon.d = random_direction(rng);
            *ray = Ray::new(ray.o, photon.d);
        }
        None
    }
}

/// Trace photons through the scene in parallel and return every deposit.
/// The photons are split in chunks that are traced independently, each with
/// its own random number stream, and the deposits are gathered in chunk
/// order so the result does not depend on the number of threads.
///
/// * `photons`  - Emitted photons.
/// * `scene`    - The scene.
/// * `settings` - Photon map settings.
pub fn trace_photons(photons: &[Photon], scene: &Scene, settings: &PhotonMapSettings) -> Vec<Photon> {
    let n_threads = settings.n_threads.max(1);
    let n_chunks = photons.len().div_ceil(PHOTON_CHUNK_SIZE);
    let tracer = PhotonTracer::new(scene, settings.max_bounces);

    info!("Tracing {} photons with {} threads", photons.len(), n_threads);
    let start = Instant::now();
    let progress = create_progress_bar(n_chunks as u64, settings.quiet);
    progress.set_message("Tracing photons");

    let mut chunks: Vec<(usize, Vec<Photon>)> = Vec::with_capacity(n_chunks);
    {
        let chunks = &mut chunks;
        let tracer = &tracer;
        let progress = &progress;

        thread::scope(|scope| {
            let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, Vec<Photon>)>(n_threads);
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

            // Spawn collector thread.
            scope.spawn(move || {
                for chunk in rx_collector.iter() {
                    chunks.push(chunk);
                    progress.inc(1);
                }
            });

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let tx_collector = tx_collector.clone();
                scope.spawn(move || {
                    for chunk_idx in rx_worker.iter() {
                        let first = chunk_idx * PHOTON_CHUNK_SIZE;
                        let last = (first + PHOTON_CHUNK_SIZE).min(photons.len());

                        // Stream 0 is used for emission.
                        let mut rng = rng_stream(settings.seed, chunk_idx + 1);
                        let mut deposits = Vec::new();
                        for photon in &photons[first..last] {
                            tracer.trace_photon(*photon, &mut rng, &mut deposits);
                        }
                        tx_collector.send((chunk_idx, deposits)).unwrap();
                    }
                });
            }
            drop(rx_worker); // Drop extra since we've cloned one for each worker.
            drop(tx_collector);

            // Send work.
            for chunk_idx in 0..n_chunks {
                tx_worker.send(chunk_idx).unwrap();
            }
        });
    }

    chunks.sort_unstable_by_key(|(chunk_idx, _)| *chunk_idx);
    let deposits: Vec<Photon> = chunks.into_iter().flat_map(|(_, deposits)| deposits).collect();

    progress.finish_with_message("Photons traced");
    info!(
        "Traced {} photons into {} deposits in {:.3}s",
        photons.len(),
        deposits.len(),
        start.elapsed().as_secs_f32()
    );

    deposits
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use photon_core::shapes::*;
    use proptest::prelude::*;

    fn light(n_samples: usize) -> LightSphere {
        LightSphere::new(
            Point3f::zero(),
            0.05,
            n_samples,
            Spectrum::ZERO,
            Spectrum::rgb(1.0, 1.0, 0.5),
            Spectrum::ONE,
            30.0,
            &mut RNG::new(7),
        )
    }

    /// A closed unit sphere around the origin.
    fn enclosure(material: Material) -> Scene {
        Scene::new(vec![Sphere::new(Point3f::zero(), 1.0, 0).into()], vec![material])
    }

    fn settings(n_threads: usize) -> PhotonMapSettings {
        PhotonMapSettings {
            n_threads,
            ..Default::default()
        }
    }

    #[test]
    fn photons_split_round_robin() {
        let light = light(4);
        let photons = generate_photons(&light, 10, &mut RNG::new(0));
        assert_eq!(photons.len(), 10);

        let counts: Vec<usize> = light
            .point_lights()
            .iter()
            .map(|l| photons.iter().filter(|photon| photon.p == l.p_light).count())
            .collect();
        assert_eq!(counts, vec![3, 3, 2, 2]);

        for (l, count) in light.point_lights().iter().zip(counts) {
            let expected = l.flux() / count as Float;
            for photon in photons.iter().filter(|photon| photon.p == l.p_light) {
                assert_eq!(photon.power, expected);
                assert!(approx_eq!(f32, photon.d.length(), 1.0, epsilon = 1e-5));
            }
        }
    }

    #[test]
    fn fewer_photons_than_lights() {
        let photons = generate_photons(&light(5), 3, &mut RNG::new(0));
        assert_eq!(photons.len(), 3);
    }

    #[test]
    fn black_material_absorbs() {
        let probabilities = ScatterProbabilities::from(&Material::default());
        assert_eq!((probabilities.pd, probabilities.ps, probabilities.pt), (0.0, 0.0, 0.0));
        assert_eq!(probabilities.pa(), 1.0);
        assert_eq!(probabilities.select(0.0), None);
    }

    #[test]
    fn select_follows_cumulative_thresholds() {
        let material = Material::glossy(Spectrum::new(1.0), Spectrum::new(1.0), 0.2, 0.3, 10.0, 0.0);
        let probabilities = ScatterProbabilities::from(&material);
        assert!(approx_eq!(f32, probabilities.pd, 0.2, epsilon = 1e-6));
        assert!(approx_eq!(f32, probabilities.ps, 0.3, epsilon = 1e-6));
        assert_eq!(probabilities.select(0.1), Some(Scatter::Diffuse));
        assert_eq!(probabilities.select(0.4), Some(Scatter::Specular));
        assert_eq!(probabilities.select(0.6), None);
    }

    #[test]
    #[should_panic]
    fn survival_above_one_fails() {
        ScatterProbabilities::from(&Material::matte(Spectrum::ONE, 1.5));
    }

    #[test]
    fn deposits_lie_on_surfaces() {
        let scene = enclosure(Material::matte(Spectrum::new(0.75), 0.8));
        let photons = generate_photons(&light(10), 200, &mut RNG::new(1));
        let deposits = trace_photons(&photons, &scene, &settings(1));
        assert!(!deposits.is_empty());
        for photon in deposits {
            assert!(approx_eq!(f32, photon.p.distance(&Point3f::zero()), 1.0, epsilon = 1e-3));
            assert!(!photon.power.has_nans());
        }
    }

    #[test]
    fn full_reflect_ratio_never_deposits() {
        let scene = enclosure(Material::mirror(Spectrum::ONE, 0.9, 1.0));
        let photons = generate_photons(&light(10), 100, &mut RNG::new(2));
        assert!(trace_photons(&photons, &scene, &settings(1)).is_empty());
    }

    #[test]
    fn transparent_never_deposits() {
        let scene = enclosure(Material::glass(Spectrum::ONE, 0.05, 0.9, 10.0, 1.5, false));
        let photons = generate_photons(&light(10), 100, &mut RNG::new(3));
        assert!(trace_photons(&photons, &scene, &settings(1)).is_empty());
    }

    #[test]
    fn empty_scene_drops_photons() {
        let scene = Scene::new(vec![], vec![]);
        let photons = generate_photons(&light(2), 4, &mut RNG::new(4));
        assert!(trace_photons(&photons, &scene, &settings(1)).is_empty());
    }

    #[test]
    fn deposits_do_not_depend_on_threads() {
        let scene = enclosure(Material::matte(Spectrum::new(0.75), 0.8));
        let photons = generate_photons(&light(10), 2 * PHOTON_CHUNK_SIZE + 100, &mut RNG::new(5));
        let single = trace_photons(&photons, &scene, &settings(1));
        let multi = trace_photons(&photons, &scene, &settings(4));
        assert_eq!(single, multi);
    }

    prop_compose! {
        fn material_strategy()(
            colour in (0.0..=1.0f32, 0.0..=1.0f32, 0.0..=1.0f32),
            highlight in (0.0..=1.0f32, 0.0..=1.0f32, 0.0..=1.0f32),
            coefs in (0.0..=1.0f32, 0.0..=1.0f32, 0.0..=1.0f32)
                .prop_filter("survival at most one", |(d, s, t)| d + s + 0.75 * t <= 1.0),
        ) -> Material {
            Material {
                diffuse: Spectrum::rgb(colour.0, colour.1, colour.2),
                specular: Spectrum::rgb(highlight.0, highlight.1, highlight.2),
                coef_diffuse: coefs.0,
                coef_specular: coefs.1,
                coef_transmission: coefs.2,
                ..Default::default()
            }
        }
    }

    proptest! {
        #[test]
        fn probabilities_sum_to_one(material in material_strategy()) {
            let p = ScatterProbabilities::from(&material);
            for v in [p.pd, p.ps, p.pt, p.pa()] {
                prop_assert!((-1e-3..=1.0 + 1e-3).contains(&v));
            }
            prop_assert!((p.pd + p.ps + p.pt + p.pa() - 1.0).abs() < 1e-3);
        }

        #[test]
        fn random_directions_are_unit(seed in 0..1000u64) {
            let mut rng = RNG::new(seed);
            let d = random_direction(&mut rng);
            prop_assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }
}
