#![warn(clippy::all)]

//! Command-line entry point. Reads `./app.config` and `./app.style` from
//! the working directory and writes `out.png`.

use geomap_render::{run, RunPaths};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&RunPaths::default()) {
        Ok(output) => {
            log::info!("Map saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
