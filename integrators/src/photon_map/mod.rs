//! Photon Mapping Integrator

use photon_accelerators::KdPhotonTree;
use photon_core::app::Options;
use photon_core::camera::*;
use photon_core::film::*;
use photon_core::geometry::*;
use photon_core::integrator::*;
use photon_core::scene::*;
use photon_core::spectrum::*;
use photon_lights::LightSphere;
use std::thread;
use std::time::Instant;

mod estimator;
mod tracer;

// Re-export
pub use estimator::*;
pub use tracer::*;

/// Default limit on the number of bounces in a photon's walk.
pub const DEFAULT_MAX_BOUNCES: usize = 64;

/// Photon map settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhotonMapSettings {
    /// Number of photons emitted from the light.
    pub n_photons: usize,

    /// Number of photons gathered per density estimate.
    pub n_nearest: usize,

    /// Maximum photon search radius.
    pub max_radius: Float,

    /// Maximum depth of reflection and transmission chains.
    pub max_depth: usize,

    /// Maximum number of bounces in a photon's walk.
    pub max_bounces: usize,

    /// Number of worker threads.
    pub n_threads: usize,

    /// Seed for the random number streams.
    pub seed: u64,

    /// Hide progress bars.
    pub quiet: bool,
}

impl Default for PhotonMapSettings {
    fn default() -> Self {
        Self {
            n_photons: 1000,
            n_nearest: 5,
            max_radius: 0.5,
            max_depth: 8,
            max_bounces: DEFAULT_MAX_BOUNCES,
            n_threads: 1,
            seed: 0,
            quiet: true,
        }
    }
}

impl From<&Options> for PhotonMapSettings {
    /// Build settings from the command line.
    ///
    /// * `options` - Command line options.
    fn from(options: &Options) -> Self {
        Self {
            n_photons: options.photon_count(),
            n_nearest: options.nearest,
            max_radius: options.radius,
            max_depth: options.max_depth,
            max_bounces: DEFAULT_MAX_BOUNCES,
            n_threads: options.threads(),
            seed: options.seed,
            quiet: options.quiet,
        }
    }
}

/// Renders a scene with a photon map of diffuse deposits combined with
/// recursive specular ray tracing.
pub struct PhotonMapIntegrator {
    /// The camera.
    camera: Camera,

    /// The area light.
    light: LightSphere,

    /// Settings.
    settings: PhotonMapSettings,

    /// Deposited photons. Empty until `preprocess()` runs.
    photon_map: KdPhotonTree,
}

impl PhotonMapIntegrator {
    /// Create a new `PhotonMapIntegrator`.
    ///
    /// * `camera`   - The camera.
    /// * `light`    - The area light.
    /// * `settings` - Settings.
    pub fn new(camera: Camera, light: LightSphere, settings: PhotonMapSettings) -> Self {
        Self {
            camera,
            light,
            settings,
            photon_map: KdPhotonTree::default(),
        }
    }

    /// Returns the photon map.
    pub fn photon_map(&self) -> &KdPhotonTree {
        &self.photon_map
    }

    /// Returns a radiance estimator over the photon map.
    ///
    /// * `scene` - The scene.
    pub fn estimator<'a>(&'a self, scene: &'a Scene) -> RadianceEstimator<'a> {
        RadianceEstimator::new(
            &self.photon_map,
            scene,
            &self.light,
            &self.camera,
            self.settings.max_radius,
            self.settings.max_depth,
        )
    }

    /// Returns the radiance arriving at the camera through a pixel.
    ///
    /// * `estimator` - The radiance estimator.
    /// * `scene`     - The scene.
    /// * `x`         - Column.
    /// * `y`         - Row.
    fn li(&self, estimator: &RadianceEstimator, scene: &Scene, x: usize, y: usize) -> Spectrum {
        let ray = self.camera.generate_ray(x, y);
        match scene.intersect(&ray) {
            Some(isect) => estimator.estimate(self.settings.n_nearest, &isect, &ray),
            None => Spectrum::ZERO,
        }
    }
}

impl Integrator for PhotonMapIntegrator {
    /// Emit and trace photons and build the photon map.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, scene: &Scene) {
        let mut rng = rng_stream(self.settings.seed, 0);
        let photons = generate_photons(&self.light, self.settings.n_photons, &mut rng);
        let deposits = trace_photons(&photons, scene, &self.settings);
        self.photon_map = KdPhotonTree::new(deposits);
    }

    /// Render the scene one row at a time.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene) -> Film {
        let (width, height) = (self.camera.width, self.camera.height);
        let n_threads = self.settings.n_threads.max(1);
        let mut film = Film::new(width, height);

        info!("Rendering {}x{} image with {} threads", width, height, n_threads);
        let start = Instant::now();
        let progress = create_progress_bar(height as u64, self.settings.quiet);
        progress.set_message("Rendering scene");

        let estimator = self.estimator(scene);
        {
            let film = &mut film;
            let estimator = &estimator;
            let progress = &progress;

            thread::scope(|scope| {
                let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, Vec<Spectrum>)>(n_threads);
                let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

                // Spawn collector thread.
                scope.spawn(move || {
                    for (y, row) in rx_collector.iter() {
                        film.set_row(y, &row);
                        progress.inc(1);
                    }
                });

                // Spawn worker threads.
                for _ in 0..n_threads {
                    let rx_worker = rx_worker.clone();
                    let tx_collector = tx_collector.clone();
                    scope.spawn(move || {
                        for y in rx_worker.iter() {
                            let row: Vec<Spectrum> = (0..width).map(|x| self.li(estimator, scene, x, y)).collect();
                            tx_collector.send((y, row)).unwrap();
                        }
                    });
                }
                drop(rx_worker); // Drop extra since we've cloned one for each worker.
                drop(tx_collector);

                // Send work.
                for y in 0..height {
                    tx_worker.send(y).unwrap();
                }
            });
        }

        progress.finish_with_message("Render complete");
        info!("Rendered image in {:.3}s", start.elapsed().as_secs_f32());

        film
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::material::*;
    use photon_core::rng::RNG;
    use photon_core::shapes::*;

    /// Half the side of the room.
    const HALF_SIDE: Float = 2.0;

    /// Faces of the room as loops of corner indices.
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 3, 2],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [0, 2, 6, 4],
        [1, 3, 7, 5],
    ];

    /// Returns a corner of the room; bits 0, 1 and 2 pick the high side
    /// along x, y and z.
    fn corner(i: usize) -> Point3f {
        let side = |bit: usize| if i & bit == 0 { -HALF_SIDE } else { HALF_SIDE };
        Point3f::new(side(1), side(2), side(4))
    }

    /// A white cube room with every wall facing the light in the middle.
    fn room() -> (Scene, LightSphere) {
        let shapes: Vec<Shape> = FACES
            .into_iter()
            .flat_map(|face| {
                let [a, b, c, d] = face.map(corner);
                [
                    Shape::from(Triangle::new(a, b, c, 0).facing(Point3f::zero())),
                    Shape::from(Triangle::new(a, c, d, 0).facing(Point3f::zero())),
                ]
            })
            .collect();
        let scene = Scene::new(shapes, vec![Material::matte(Spectrum::new(0.75), 0.8)]);
        let light = LightSphere::new(
            Point3f::zero(),
            0.05,
            4,
            Spectrum::ZERO,
            Spectrum::ONE,
            Spectrum::ONE,
            30.0,
            &mut RNG::new(0),
        );
        (scene, light)
    }

    fn integrator(light: LightSphere, n_threads: usize) -> PhotonMapIntegrator {
        let camera = Camera::new(Point3f::new(0.0, 0.0, -1.0), 0.0, 6, 4);
        let settings = PhotonMapSettings {
            n_photons: 500,
            max_radius: 1.0,
            n_threads,
            ..Default::default()
        };
        PhotonMapIntegrator::new(camera, light, settings)
    }

    #[test]
    fn unprocessed_map_is_empty() {
        let (scene, light) = room();
        let integrator = integrator(light, 1);
        assert!(integrator.photon_map().is_empty());

        let film = integrator.render(&scene);
        assert_eq!((film.width, film.height), (6, 4));
        assert!(film.pixels().iter().all(|p| p.is_black()));
    }

    #[test]
    fn preprocess_fills_map_and_lights_the_room() {
        let (scene, light) = room();
        let mut integrator = integrator(light, 2);
        integrator.preprocess(&scene);
        assert!(!integrator.photon_map().is_empty());

        // The light has no ambient term, so only photons light the walls.
        let film = integrator.render(&scene);
        assert!(film.pixels().iter().all(|p| !p.has_nans()));
        assert!(film.pixels().iter().any(|p| !p.is_black()));
    }

    #[test]
    fn render_does_not_depend_on_threads() {
        let (scene, light) = room();
        let mut single = integrator(light.clone(), 1);
        let mut multi = integrator(light, 3);
        single.preprocess(&scene);
        multi.preprocess(&scene);
        assert_eq!(single.render(&scene).pixels(), multi.render(&scene).pixels());
    }
}
