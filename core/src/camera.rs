//! Camera

use crate::geometry::*;

/// A pinhole camera looking down +z, turned about the y-axis by its yaw.
/// Image rows grow along +y.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    /// Eye position.
    pub position: Point3f,

    /// Rotation about the y-axis in radians.
    pub yaw: Float,

    /// Distance from the eye to the image plane in pixels.
    pub focal_length: Float,

    /// Image width in pixels.
    pub width: usize,

    /// Image height in pixels.
    pub height: usize,
}

impl Camera {
    /// Create a new `Camera` whose focal length equals the image height,
    /// giving a 53° vertical field of view.
    ///
    /// * `position` - Eye position.
    /// * `yaw`      - Rotation about the y-axis in radians.
    /// * `width`    - Image width in pixels.
    /// * `height`   - Image height in pixels.
    pub fn new(position: Point3f, yaw: Float, width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "empty image");
        Self {
            position,
            yaw,
            focal_length: height as Float,
            width,
            height,
        }
    }

    /// Returns the primary ray through a pixel.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn generate_ray(&self, x: usize, y: usize) -> Ray {
        let d = Vector3f::new(
            x as Float - (self.width / 2) as Float,
            y as Float - (self.height / 2) as Float,
            self.focal_length,
        );
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let d = Vector3f::new(
            cos_yaw * d.x - sin_yaw * d.z,
            d.y,
            sin_yaw * d.x + cos_yaw * d.z,
        );
        Ray::new(self.position, d.normalize())
    }

    /// Returns the unit direction from the eye towards a point.
    ///
    /// * `p` - The point.
    pub fn direction_to(&self, p: &Point3f) -> Vector3f {
        (*p - self.position).normalize()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn centre_pixel_looks_forward() {
        let camera = Camera::new(Point3f::new(0.0, 0.0, -3.0), 0.0, 500, 500);
        let ray = camera.generate_ray(250, 250);
        assert_eq!(ray.o, camera.position);
        assert!(approx_eq!(f32, ray.d.z, 1.0, epsilon = 0.0001));
    }

    #[test]
    fn rows_grow_along_y() {
        let camera = Camera::new(Point3f::zero(), 0.0, 100, 100);
        assert!(camera.generate_ray(50, 99).d.y > 0.0);
        assert!(camera.generate_ray(50, 0).d.y < 0.0);
    }

    #[test]
    fn yaw_turns_the_view() {
        let camera = Camera::new(Point3f::zero(), PI / 2.0, 100, 100);
        let d = camera.generate_ray(50, 50).d;
        assert!(approx_eq!(f32, d.x, -1.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, d.z, 0.0, epsilon = 0.0001));
    }
}
