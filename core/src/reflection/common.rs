//! Reflection and refraction directions

use crate::geometry::*;

/// Returns the mirror reflection of a direction of travel about a surface
/// normal. The side the normal faces does not matter.
///
/// * `d` - Direction of travel towards the surface.
/// * `n` - Surface normal.
#[inline]
pub fn reflect(d: &Vector3f, n: &Normal3f) -> Vector3f {
    *d - Vector3f::from(*n) * (2.0 * d.dot(n))
}

/// Returns the refracted direction of travel through a dielectric boundary
/// using Snell's law, or `None` under total internal reflection. The ray is
/// entering the material when it travels against the outward normal; the
/// outside is assumed to have an index of refraction of 1.
///
/// * `d`   - Unit direction of travel towards the surface.
/// * `n`   - Unit outward surface normal.
/// * `ior` - Index of refraction of the material.
pub fn refract(d: &Vector3f, n: &Normal3f, ior: Float) -> Option<Vector3f> {
    let mut cos_theta_i = -d.dot(n);
    let (eta, n) = if cos_theta_i > 0.0 {
        (1.0 / ior, *n)
    } else {
        cos_theta_i = -cos_theta_i;
        (ior, -*n)
    };

    // Compute cos(theta_t) using Snell's law
    let sin_2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin_2_theta_t = eta * eta * sin_2_theta_i;

    // Handle total internal reflection for transmission.
    if sin_2_theta_t > 1.0 {
        None
    } else {
        let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
        Some(*d * eta + Vector3f::from(n) * (eta * cos_theta_i - cos_theta_t))
    }
}

/// Returns the direction a transmitted ray continues in: the refracted
/// direction, or the mirror reflection when refraction is impossible.
///
/// * `d`   - Unit direction of travel towards the surface.
/// * `n`   - Unit outward surface normal.
/// * `ior` - Index of refraction of the material.
pub fn transmit(d: &Vector3f, n: &Normal3f, ior: Float) -> Vector3f {
    refract(d, n, ior).unwrap_or_else(|| reflect(d, n))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
