//! Film

use crate::image_io::*;
use crate::spectrum::*;

/// The rendered frame: one unclamped RGB value per pixel, stored row by row.
#[derive(Clone, Debug)]
pub struct Film {
    /// Width in pixels.
    pub width: usize,

    /// Height in pixels.
    pub height: usize,

    /// Pixel values.
    pixels: Vec<Spectrum>,
}

impl Film {
    /// Create a new black `Film`.
    ///
    /// * `width`  - Width in pixels.
    /// * `height` - Height in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::ZERO; width * height],
        }
    }

    /// Returns all pixel values, row by row.
    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// Returns the value of a pixel.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn pixel(&self, x: usize, y: usize) -> Spectrum {
        self.pixels[y * self.width + x]
    }

    /// Replace a full row of pixels.
    ///
    /// * `y`   - Row.
    /// * `row` - Pixel values, left to right.
    pub fn set_row(&mut self, y: usize, row: &[Spectrum]) {
        assert_eq!(row.len(), self.width, "row {y} has the wrong width");
        let offset = y * self.width;
        self.pixels[offset..offset + self.width].copy_from_slice(row);
    }

    /// Write the image to a file; the format follows the extension.
    ///
    /// * `path` - Output file path.
    pub fn write_image(&self, path: &str) -> Result<(), String> {
        let rgb: Vec<_> = self.pixels.iter().flat_map(|s| s.to_rgb()).collect();
        write_image(path, &rgb, self.width as u32, self.height as u32)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_row_stores_pixels() {
        let mut film = Film::new(2, 3);
        film.set_row(1, &[Spectrum::new(0.5), Spectrum::new(1.0)]);
        assert_eq!(film.pixel(0, 1), Spectrum::new(0.5));
        assert_eq!(film.pixel(1, 1), Spectrum::new(1.0));
        assert!(film.pixel(0, 0).is_black());
    }

    #[test]
    #[should_panic]
    fn set_row_rejects_wrong_width() {
        Film::new(2, 2).set_row(0, &[Spectrum::ZERO]);
    }
}
