//! Fresnel Dielectrics

use crate::geometry::*;
use std::mem::swap;

/// Returns the Fresnel reflection at the boundary between two dielectric
/// media for unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal on the same side as incident direction `wi`.
/// * `eta_i`       - Index of refraction for medium that incident ray is in.
/// * `eta_t`       - Index of refraction for medium that incident ray is entering.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta_i = eta_i;
    let mut eta_t = eta_t;

    // Potentially swap indices of refraction.
    let entering = cos_theta_i > 0.0;
    if !entering {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    // Compute _cosThetaT_ using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        1.0
    } else {
        let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
        let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
            / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
        let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
            / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
        (r_parl * r_parl + r_perp * r_perp) / 2.0
    }
}

/// Returns the fraction of light reflected where a ray meets the surface of a
/// dielectric surrounded by a medium with index of refraction 1.
///
/// * `d`   - Direction of travel towards the surface.
/// * `n`   - Outward surface normal.
/// * `ior` - Index of refraction of the material.
pub fn fresnel_ratio(d: &Vector3f, n: &Normal3f, ior: Float) -> Float {
    fr_dielectric(-d.dot(n), 1.0, ior)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn normal_incidence_glass() {
        // ((1.5 - 1) / (1.5 + 1))^2
        assert!(approx_eq!(f32, fr_dielectric(1.0, 1.0, 1.5), 0.04, epsilon = 0.0001));
        assert!(approx_eq!(f32, fr_dielectric(-1.0, 1.0, 1.5), 0.04, epsilon = 0.0001));
    }

    #[test]
    fn total_internal_reflection_is_one() {
        let n = Normal3f::new(0.0, 1.0, 0.0);
        let d = Vector3f::new(0.9, 0.1, 0.0).normalize();
        assert_eq!(fresnel_ratio(&d, &n, 1.5), 1.0);
    }

    #[test]
    fn matched_indices_do_not_reflect() {
        assert!(approx_eq!(f32, fr_dielectric(0.7, 1.0, 1.0), 0.0, epsilon = 0.0001));
    }

    proptest! {
        #[test]
        fn ratio_is_bounded(cos_theta_i in -1.0..1.0f32, ior in 1.0..2.5f32) {
            let fr = fr_dielectric(cos_theta_i, 1.0, ior);
            prop_assert!((0.0..=1.0).contains(&fr));
        }
    }
}
