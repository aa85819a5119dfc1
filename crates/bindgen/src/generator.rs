//! The boundary to the external binding generator.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use auto_impl::auto_impl;
use tracing::{debug, trace};

use crate::GenerationError;

/// Everything a generator needs to produce one binding file.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorInput<'a> {
    /// Scratch file holding the compact ABI JSON
    pub abi: &'a Path,
    /// Scratch file holding the bytecode, absent for interface-only contracts
    pub bytecode: Option<&'a Path>,
    /// Package (namespace) of the generated binding
    pub package: &'a str,
    /// Exported type name of the generated binding
    pub type_name: &'a str,
    /// Binding file to write
    pub out: &'a Path,
}

/// Converts an ABI and optional bytecode into source bindings.
///
/// Implementations must be usable from several worker threads at once.
#[auto_impl(&, Box, Arc)]
pub trait BindingGenerator: Send + Sync {
    /// Generates one binding file.
    fn generate(&self, input: &GeneratorInput<'_>) -> Result<(), GenerationError>;
}

/// Runs the go-ethereum `abigen` tool (or anything with the same flags).
#[derive(Debug, Clone)]
pub struct Abigen {
    program: PathBuf,
    extra_args: Vec<OsString>,
}

impl Default for Abigen {
    fn default() -> Self {
        Self::new("abigen")
    }
}

impl Abigen {
    /// Creates a generator that runs `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), extra_args: Vec::new() }
    }

    /// Appends arguments passed after the standard flags, e.g. `--lang go`.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program this generator runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Builds the command line for one invocation without running it.
    pub fn command(&self, input: &GeneratorInput<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--abi").arg(input.abi);
        if let Some(bin) = input.bytecode {
            cmd.arg("--bin").arg(bin);
        }
        cmd.arg("--pkg")
            .arg(input.package)
            .arg("--type")
            .arg(input.type_name)
            .arg("--out")
            .arg(input.out)
            .args(&self.extra_args);
        cmd
    }
}

impl BindingGenerator for Abigen {
    fn generate(&self, input: &GeneratorInput<'_>) -> Result<(), GenerationError> {
        let program = self.program.display().to_string();
        let mut cmd = self.command(input);
        debug!(?cmd, "running generator");

        let output =
            cmd.output().map_err(|source| GenerationError::Spawn { program: program.clone(), source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            trace!(type_name = input.type_name, stdout = %stdout.trim(), "generator stdout");
        }

        if !output.status.success() {
            return Err(GenerationError::Failed {
                program,
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            debug!(type_name = input.type_name, stderr = %stderr.trim(), "generator stderr");
        }

        Ok(())
    }
}
