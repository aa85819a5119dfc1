//! `hubble-abigen` CLI tool
//!
//! Generates language bindings for the hubble contracts by running `abigen` over the compiled
//! artifacts listed in a manifest.

use std::process::ExitCode;

use clap::Parser;
use hubble_abigen::MainCmd;

fn main() -> ExitCode {
    match MainCmd::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
