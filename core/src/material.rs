//! Materials

use crate::pbrt::*;
use crate::spectrum::*;

/// Surface description shared by the photon tracer and the radiance
/// estimator. Read-only once a scene is built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Ambient colour.
    pub ambient: Spectrum,

    /// Diffuse colour.
    pub diffuse: Spectrum,

    /// Specular colour.
    pub specular: Spectrum,

    /// Emitted colour.
    pub emitted: Spectrum,

    /// Weight of specular photon bounces.
    pub coef_specular: Float,

    /// Weight of diffuse photon bounces.
    pub coef_diffuse: Float,

    /// Weight of photon transmission.
    pub coef_transmission: Float,

    /// Blinn-Phong exponent. Zero disables the highlight.
    pub shininess: Float,

    /// Surface reflects the view ray.
    pub reflective: bool,

    /// Fraction of the reflected colour blended with the local surface colour.
    pub reflect_ratio: Float,

    /// Surface transmits the view ray.
    pub transparent: bool,

    /// Index of refraction.
    pub ior: Float,
}

impl Default for Material {
    /// Returns a black, fully absorbing material.
    fn default() -> Self {
        Self {
            ambient: Spectrum::ZERO,
            diffuse: Spectrum::ZERO,
            specular: Spectrum::ZERO,
            emitted: Spectrum::ZERO,
            coef_specular: 0.0,
            coef_diffuse: 0.0,
            coef_transmission: 0.0,
            shininess: 0.0,
            reflective: false,
            reflect_ratio: 0.0,
            transparent: false,
            ior: 1.0,
        }
    }
}

impl Material {
    /// Returns a diffuse material with no highlight.
    ///
    /// * `colour`       - Ambient, diffuse and specular colour.
    /// * `coef_diffuse` - Weight of diffuse photon bounces.
    pub fn matte(colour: Spectrum, coef_diffuse: Float) -> Self {
        Self {
            ambient: colour,
            diffuse: colour,
            specular: colour,
            coef_diffuse,
            ..Default::default()
        }
    }

    /// Returns a diffuse material with a Blinn-Phong highlight that
    /// optionally mirrors part of its surroundings.
    ///
    /// * `colour`        - Ambient and diffuse colour.
    /// * `highlight`     - Specular colour.
    /// * `coef_diffuse`  - Weight of diffuse photon bounces.
    /// * `coef_specular` - Weight of specular photon bounces.
    /// * `shininess`     - Blinn-Phong exponent.
    /// * `reflect_ratio` - Mirror blend; zero disables reflection.
    pub fn glossy(
        colour: Spectrum,
        highlight: Spectrum,
        coef_diffuse: Float,
        coef_specular: Float,
        shininess: Float,
        reflect_ratio: Float,
    ) -> Self {
        Self {
            ambient: colour,
            diffuse: colour,
            specular: highlight,
            coef_diffuse,
            coef_specular,
            shininess,
            reflective: reflect_ratio > 0.0,
            reflect_ratio,
            ..Default::default()
        }
    }

    /// Returns a mirror blended with its own colour.
    ///
    /// * `colour`        - Ambient, diffuse and specular colour.
    /// * `coef_specular` - Weight of specular photon bounces.
    /// * `reflect_ratio` - Mirror blend.
    pub fn mirror(colour: Spectrum, coef_specular: Float, reflect_ratio: Float) -> Self {
        Self {
            ambient: colour,
            diffuse: colour,
            specular: colour,
            coef_specular,
            reflective: true,
            reflect_ratio,
            ..Default::default()
        }
    }

    /// Returns a transparent dielectric. When `fresnel` is set the surface
    /// also reflects, weighted by the Fresnel ratio.
    ///
    /// * `colour`            - Ambient, diffuse and specular colour.
    /// * `coef_specular`     - Weight of specular photon bounces.
    /// * `coef_transmission` - Weight of photon transmission.
    /// * `shininess`         - Blinn-Phong exponent.
    /// * `ior`               - Index of refraction.
    /// * `fresnel`           - Reflect as well as refract.
    pub fn glass(
        colour: Spectrum,
        coef_specular: Float,
        coef_transmission: Float,
        shininess: Float,
        ior: Float,
        fresnel: bool,
    ) -> Self {
        Self {
            ambient: colour,
            diffuse: colour,
            specular: colour,
            coef_specular,
            coef_transmission,
            shininess,
            reflective: fresnel,
            reflect_ratio: if fresnel { 1.0 } else { 0.6 },
            transparent: true,
            ior,
            ..Default::default()
        }
    }
}
