//! Application related stuff

use crate::pbrt::Float;
use clap::Parser;

/// Default output image path.
pub const DEFAULT_IMAGE_FILE: &str = "photon_map.png";

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Render a Cornell box with photon mapping.", long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for tracing and rendering."
    )]
    n_threads: usize,

    /// Number of photons emitted from the light.
    #[arg(long, short = 'n', value_name = "NUM", default_value_t = 1000)]
    pub photons: usize,

    /// Number of photons gathered per density estimate.
    #[arg(long, short = 'k', value_name = "NUM", default_value_t = 5)]
    pub nearest: usize,

    /// Maximum photon search radius.
    #[arg(long, short = 'r', value_name = "FLOAT", default_value_t = 0.5)]
    pub radius: Float,

    /// Number of point lights making up the area light.
    #[arg(long = "light-samples", value_name = "NUM", default_value_t = 50)]
    pub light_samples: usize,

    /// Maximum depth of reflection and refraction chains.
    #[arg(long = "max-depth", value_name = "NUM", default_value_t = 8)]
    pub max_depth: usize,

    /// Image width in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 500)]
    pub width: usize,

    /// Image height in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 500)]
    pub height: usize,

    /// Seed for the random number generators.
    #[arg(long, value_name = "NUM", default_value_t = 0)]
    pub seed: u64,

    /// Automatically reduce a number of quality settings to render more quickly.
    #[arg(
        long = "quick",
        help = "Automatically reduce a number of quality settings to render more quickly."
    )]
    pub quick_render: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        help = "Write the final image to the given filename (.png, .tga or .pfm)."
    )]
    pub image_file: Option<String>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the number of photons to emit.
    pub fn photon_count(&self) -> usize {
        if self.quick_render {
            self.photons / 4
        } else {
            self.photons
        }
    }

    /// Returns the image resolution.
    pub fn resolution(&self) -> (usize, usize) {
        if self.quick_render {
            (self.width.div_ceil(4), self.height.div_ceil(4))
        } else {
            (self.width, self.height)
        }
    }

    /// Returns the output image path.
    pub fn image_file(&self) -> String {
        self.image_file.clone().unwrap_or_else(|| DEFAULT_IMAGE_FILE.to_string())
    }

    /// Check option values that clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.radius > 0.0) {
            return Err(format!("Search radius must be positive, got {}", self.radius));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("Invalid resolution {}x{}", self.width, self.height));
        }
        if self.light_samples == 0 {
            return Err("The light needs at least one sample".to_string());
        }
        if self.max_depth == 0 {
            return Err("Maximum depth must be at least 1".to_string());
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::try_parse_from(["photon-mapper"]).unwrap();
        assert_eq!(options.photon_count(), 1000);
        assert_eq!(options.nearest, 5);
        assert_eq!(options.radius, 0.5);
        assert_eq!(options.light_samples, 50);
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.resolution(), (500, 500));
        assert_eq!(options.image_file(), DEFAULT_IMAGE_FILE);
        assert_eq!(options.threads(), 1);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn quick_reduces_work() {
        let options = Options::try_parse_from(["photon-mapper", "--quick", "-n", "400"]).unwrap();
        assert_eq!(options.photon_count(), 100);
        assert_eq!(options.resolution(), (125, 125));
    }

    #[test]
    fn zero_threads_falls_back_to_one() {
        let options = Options::try_parse_from(["photon-mapper", "-t", "0"]).unwrap();
        assert_eq!(options.threads(), 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let options = Options::try_parse_from(["photon-mapper", "-r", "0"]).unwrap();
        assert!(options.validate().is_err());

        let options = Options::try_parse_from(["photon-mapper", "--width", "0"]).unwrap();
        assert!(options.validate().is_err());

        assert!(Options::try_parse_from(["photon-mapper", "-n", "lots"]).is_err());
    }
}
