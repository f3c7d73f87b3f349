//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod camera;
pub mod film;
pub mod geometry;
pub mod image_io;
pub mod integrator;
pub mod interaction;
pub mod material;
pub mod pbrt;
pub mod photon;
pub mod reflection;
pub mod rng;
pub mod scene;
pub mod shapes;
pub mod spectrum;
