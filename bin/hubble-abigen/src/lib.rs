//! Command-line front end for hubble contract binding generation.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod cmd;
pub use cmd::*;

/// Shared arguments, errors and logging setup
pub mod common;
/// `generate` subcommand
pub mod generate;
/// `list` subcommand
pub mod list;

pub use common::{CliError as Error, Result};
