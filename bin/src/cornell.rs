//! Cornell Box

use photon_core::camera::*;
use photon_core::geometry::*;
use photon_core::material::*;
use photon_core::scene::*;
use photon_core::shapes::*;
use photon_core::spectrum::*;
use photon_integrators::rng_stream;
use photon_lights::LightSphere;

/// Side of the box in model units.
const L: Float = 555.0;

/// Random number stream used to place the light samples. Streams from 0 up
/// are used for photon tracing.
const LIGHT_STREAM: usize = u32::MAX as usize;

/// Material table indices.
const FLOOR: usize = 0;
const LEFT_WALL: usize = 1;
const RIGHT_WALL: usize = 2;
const CEILING: usize = 3;
const BACK_WALL: usize = 4;
const SHORT_BLOCK: usize = 5;
const TALL_BLOCK: usize = 6;
const RED_SPHERE: usize = 7;
const GLASS_SPHERE: usize = 8;
const PINK_SPHERE: usize = 9;

/// The classic Cornell box rescaled to [-1, 1]^3 with its open side facing
/// the camera, two blocks, three spheres and a small spherical light.
pub struct CornellBox {
    /// The scene.
    pub scene: Scene,

    /// The light.
    pub light: LightSphere,

    /// The camera.
    pub camera: Camera,
}

impl CornellBox {
    /// Build the Cornell box.
    ///
    /// * `width`         - Image width in pixels.
    /// * `height`        - Image height in pixels.
    /// * `light_samples` - Number of point lights in the light sphere.
    /// * `seed`          - Seed used to place the light samples.
    pub fn new(width: usize, height: usize, light_samples: usize, seed: u64) -> Self {
        let mut shapes = room();
        shapes.extend(block(
            [[240.0, 234.0], [80.0, 185.0], [190.0, 392.0], [32.0, 345.0]],
            165.0,
            SHORT_BLOCK,
        ));
        shapes.extend(block(
            [[443.0, 247.0], [285.0, 296.0], [492.0, 406.0], [334.0, 456.0]],
            330.0,
            TALL_BLOCK,
        ));
        shapes.push(Sphere::new(Point3f::new(0.0, 0.0, 1.2), 0.6, RED_SPHERE).into());
        shapes.push(Sphere::new(Point3f::new(0.5, 165.0 / L - 0.15, -0.2), 0.25, GLASS_SPHERE).into());
        shapes.push(Sphere::new(Point3f::new(-0.2, 0.85, -0.6), 0.19, PINK_SPHERE).into());

        let scene = Scene::new(shapes, materials());

        let light_colour = Spectrum::rgb(1.0, 1.0, 0.9);
        let light = LightSphere::new(
            Point3f::new(0.0, -0.4, -0.9),
            0.05,
            light_samples,
            Spectrum::ZERO,
            light_colour,
            light_colour,
            30.0,
            &mut rng_stream(seed, LIGHT_STREAM),
        );

        let camera = Camera::new(Point3f::new(0.0, 0.0, -3.0), 0.0, width, height);

        Self { scene, light, camera }
    }
}

/// Returns the material table.
fn materials() -> Vec<Material> {
    let white = Spectrum::new(0.75);
    let blue = Spectrum::rgb(0.15, 0.15, 0.75);
    let dark_red = Spectrum::rgb(0.902, 0.153, 0.225);
    let pink = Spectrum::rgb(1.0, 0.6, 1.0);
    let turquoise = Spectrum::rgb(0.43, 0.827, 0.819);
    let purple = Spectrum::rgb(0.565, 0.408, 0.745);

    let mut materials = vec![Material::default(); 10];
    materials[FLOOR] = Material::glossy(white, white, 0.1, 0.5, 200.0, 0.3);
    materials[LEFT_WALL] = Material::matte(dark_red, 0.3);
    materials[RIGHT_WALL] = Material::matte(purple, 0.3);
    materials[CEILING] = Material::matte(white, 0.3);
    materials[BACK_WALL] = Material::matte(turquoise, 0.3);
    materials[SHORT_BLOCK] = Material::matte(blue, 0.8);
    materials[TALL_BLOCK] = Material::glass(white, 0.05, 0.9, 10.0, 1.8, true);
    materials[RED_SPHERE] = Material::mirror(dark_red, 0.9, 0.2);
    materials[GLASS_SPHERE] = Material::glass(white, 0.05, 0.9, 10.0, 1.5, false);
    materials[PINK_SPHERE] = Material::glossy(pink, white, 0.1, 0.5, 200.0, 0.1);
    materials
}

/// Map a point from box units to [-1, 1]^3 with y pointing down and x
/// mirrored.
fn to_scene(x: Float, y: Float, z: Float) -> Point3f {
    Point3f::new(-(x * 2.0 / L - 1.0), -(y * 2.0 / L - 1.0), z * 2.0 / L - 1.0)
}

/// Returns the floor, walls and ceiling, all facing into the room.
fn room() -> Vec<Shape> {
    let a = to_scene(L, 0.0, 0.0);
    let b = to_scene(0.0, 0.0, 0.0);
    let c = to_scene(L, 0.0, L);
    let d = to_scene(0.0, 0.0, L);
    let e = to_scene(L, L, 0.0);
    let f = to_scene(0.0, L, 0.0);
    let g = to_scene(L, L, L);
    let h = to_scene(0.0, L, L);

    [
        (c, b, a, FLOOR),
        (c, d, b, FLOOR),
        (a, e, c, LEFT_WALL),
        (c, e, g, LEFT_WALL),
        (f, b, d, RIGHT_WALL),
        (h, f, d, RIGHT_WALL),
        (e, f, g, CEILING),
        (f, h, g, CEILING),
        (g, d, c, BACK_WALL),
        (g, h, d, BACK_WALL),
    ]
    .into_iter()
    .map(|(v0, v1, v2, material)| Triangle::new(v0, v1, v2, material).facing(Point3f::zero()).into())
    .collect()
}

/// Returns the sides and top of an upright block, facing out.
///
/// * `base`     - Corners of the base as (x, z) in box units.
/// * `height`   - Height in box units.
/// * `material` - Material index.
fn block(base: [[Float; 2]; 4], height: Float, material: usize) -> Vec<Shape> {
    let [a, b, c, d] = base.map(|[x, z]| to_scene(x, 0.0, z));
    let [e, f, g, h] = base.map(|[x, z]| to_scene(x, height, z));

    let corners = [a, b, c, d, e, f, g, h];
    let centre = Point3f::from(
        corners
            .iter()
            .fold(Vector3f::zero(), |sum, p| sum + Vector3f::from(*p))
            / corners.len() as Float,
    );

    [
        (e, b, a),
        (e, f, b),
        (f, d, b),
        (f, h, d),
        (h, c, d),
        (h, g, c),
        (g, e, c),
        (e, a, c),
        (g, f, e),
        (g, h, f),
    ]
    .into_iter()
    .map(|(v0, v1, v2)| Triangle::new(v0, v1, v2, material).facing_away(centre).into())
    .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
