//! Photons

use crate::geometry::*;
use crate::spectrum::*;

/// A packet of light energy travelling through, or deposited in, the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Photon {
    /// Position.
    pub p: Point3f,

    /// Unit direction of travel.
    pub d: Vector3f,

    /// RGB power.
    pub power: Spectrum,

    /// Reserved for index bookkeeping.
    pub flag: i16,
}

impl Photon {
    /// Create a new `Photon`.
    ///
    /// * `p`     - Position.
    /// * `d`     - Unit direction of travel.
    /// * `power` - RGB power.
    pub fn new(p: Point3f, d: Vector3f, power: Spectrum) -> Self {
        Self { p, d, power, flag: 0 }
    }

    /// Returns the ray the photon travels along.
    pub fn ray(&self) -> Ray {
        Ray::new(self.p, self.d)
    }
}
