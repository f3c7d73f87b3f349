//! Point Light Source

use photon_core::geometry::*;
use photon_core::spectrum::*;

/// An isotropic point light; one sample of an area light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    /// Position.
    pub p_light: Point3f,

    /// Ambient colour.
    pub ambient: Spectrum,

    /// Diffuse colour.
    pub diffuse: Spectrum,

    /// Specular colour.
    pub specular: Spectrum,

    /// Emitted power.
    pub power: Float,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`  - Position.
    /// * `ambient`  - Ambient colour.
    /// * `diffuse`  - Diffuse colour.
    /// * `specular` - Specular colour.
    /// * `power`    - Emitted power.
    pub fn new(p_light: Point3f, ambient: Spectrum, diffuse: Spectrum, specular: Spectrum, power: Float) -> Self {
        Self {
            p_light,
            ambient,
            diffuse,
            specular,
            power,
        }
    }

    /// Returns the power carried by all photons leaving this light.
    pub fn flux(&self) -> Spectrum {
        self.diffuse * self.power
    }
}
