#[macro_use]
extern crate log;

use clap::Parser;
use photon_core::app::*;
use photon_core::integrator::*;
use photon_integrators::*;
use std::process::ExitCode;
use std::time::Instant;

mod cornell;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() -> ExitCode {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    match render(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn render(options: &Options) -> Result<(), String> {
    options.validate()?;

    let start = Instant::now();
    let (width, height) = options.resolution();
    let cornell = cornell::CornellBox::new(width, height, options.light_samples, options.seed);

    let settings = PhotonMapSettings::from(options);
    let mut integrator = PhotonMapIntegrator::new(cornell.camera, cornell.light, settings);
    integrator.preprocess(&cornell.scene);
    let film = integrator.render(&cornell.scene);

    let path = options.image_file();
    film.write_image(&path)?;
    info!("Wrote {} in {:.3}s", path, start.elapsed().as_secs_f32());

    Ok(())
}
