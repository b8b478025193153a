#![allow(clippy::multiple_crate_versions)]

//! Autotile - automatic window tiling engine.
//!
//! Command-line front end: offline layout calculation, scenario replay,
//! configuration inspection and schema output.

fn main() {
    if let Err(err) = autotile_lib::cli::run() {
        eprintln!("autotile: {err}");
        std::process::exit(1);
    }
}
