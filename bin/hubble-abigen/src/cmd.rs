use clap::{Parser, Subcommand};

use crate::common::{LogArgs, Result};

/// Generate contract bindings from compiled hubble-contracts artifacts
#[derive(Parser, Debug)]
#[command(name = "hubble-abigen", version, infer_subcommands = true)]
pub struct MainCmd {
    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the hubble-abigen CLI tool
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wipe the output root and generate every binding
    Generate(crate::generate::Cmd),
    /// Print the resolved plan
    List(crate::list::Cmd),
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<()> {
        self.log.init()?;
        match &self.command {
            Command::Generate(cmd) => cmd.run(),
            Command::List(cmd) => cmd.run(),
        }
    }
}
