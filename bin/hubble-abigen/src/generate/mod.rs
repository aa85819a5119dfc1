//! Binding generation subcommand

mod cmd;

pub use cmd::*;
