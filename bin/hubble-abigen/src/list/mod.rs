//! Plan listing subcommand

mod cmd;

pub use cmd::*;
