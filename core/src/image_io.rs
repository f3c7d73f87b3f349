//! Image I/O

use crate::pbrt::*;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use image::*;
use itertools::iproduct;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::result::Result;
use std::sync::OnceLock;

/// Write the output image to given path.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
pub fn write_image(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    if rgb.len() != 3 * (res_x * res_y) as usize {
        return Err(format!(
            "Expected {} RGB values for a {res_x}x{res_y} image but got {}",
            3 * res_x * res_y,
            rgb.len()
        ));
    }

    match get_extension_from_filename(path) {
        Some(".tga") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Png),
        Some(".pfm") => write_pfm(path, rgb, res_x, res_y),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension. This will match the last occurrence of a period
/// followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").unwrap())
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    // Allocate an image buffer.
    let mut imgbuf = ImageBuffer::new(res_x, res_y);
    for (offset, (y, x)) in iproduct!(0..res_y, 0..res_x).enumerate() {
        // 8-bit format; apply gamma and clamp.
        let i = 3 * offset;
        let rgb = apply_gamma(&[rgb[i], rgb[i + 1], rgb[i + 2]]);
        imgbuf.put_pixel(x, y, Rgb(rgb));
    }

    // Write the output file.
    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

/// Writes the image in PFM (Portable FloatMap) format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_pfm(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let width = res_x as usize;
    let height = res_y as usize;
    let file = File::create(path).map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))?;
    let mut file = BufWriter::new(file);

    // Only write 3 channel PFMs here. The sign of the scale encodes endianness.
    let scale = if cfg!(target_endian = "big") { 1.0 } else { -1.0 };
    write!(file, "PF\n{width} {height}\n{scale}\n")
        .map_err(|e| format!("write_pfm(): Error writing PFM header '{path}': {e}"))?;

    // Rows are stored bottom to top.
    for y in (0..height).rev() {
        for &f in &rgb[y * width * 3..(y + 1) * width * 3] {
            if cfg!(target_endian = "big") {
                file.write_f32::<BigEndian>(f)
            } else {
                file.write_f32::<LittleEndian>(f)
            }
            .map_err(|e| format!("write_pfm(): Error writing PFM pixels '{path}': {e}"))?;
        }
    }
    file.flush().map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))
}

/// Apply gamma correction to a RGB floating point pixel and return the clamped 8-bit values.
///
/// * `rgb` - RGB floating point pixel value.
#[inline]
fn apply_gamma(rgb: &[Float; 3]) -> [u8; 3] {
    [clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])]
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
