//! Integrator

use crate::film::Film;
use crate::scene::Scene;
use indicatif::{ProgressBar, ProgressStyle};

/// Integrator interface.
pub trait Integrator {
    /// Preprocess the scene. Must run once before `render()`.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, scene: &Scene);

    /// Render the scene and return the frame.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene) -> Film;
}

/// Returns a progress bar for a long running phase. The bar is hidden when
/// `quiet` is set.
///
/// * `len`   - Number of steps.
/// * `quiet` - Suppress output.
pub fn create_progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    progress.set_style(style);
    progress
}
