//! Test utilities: an in-process generator that records what it was asked to do.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{BindingGenerator, GenerationError, GeneratorInput};

/// Snapshot of one generator call, taken while the scratch files still exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exported type name
    pub type_name: String,
    /// Package name
    pub package: String,
    /// Requested output path
    pub out: PathBuf,
    /// ABI scratch path
    pub abi_path: PathBuf,
    /// Content of the ABI scratch file
    pub abi: String,
    /// Bytecode scratch path, if one was passed
    pub bytecode_path: Option<PathBuf>,
    /// Content of the bytecode scratch file, if one was passed
    pub bytecode: Option<String>,
    /// Sorted names of the files present in the scratch directory
    pub scratch_files: Vec<String>,
}

/// A [`BindingGenerator`] that writes a deterministic stub binding and records every call.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    invocations: Mutex<Vec<Invocation>>,
    fail_types: HashSet<String>,
}

impl RecordingGenerator {
    /// Creates a generator that succeeds for every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the generator fail for the given type name.
    pub fn failing_on(mut self, type_name: impl Into<String>) -> Self {
        self.fail_types.insert(type_name.into());
        self
    }

    /// Calls recorded so far, in call order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("invocations lock poisoned").clone()
    }

    /// Type names invoked so far, in call order.
    pub fn invoked_types(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.type_name).collect()
    }

    /// The stub binding written for an invocation.
    pub fn render(package: &str, type_name: &str, abi: &str, bytecode: Option<&str>) -> String {
        format!(
            "// Code generated - DO NOT EDIT.\npackage {package}\n\n// {type_name}ABI = {abi}\n// {type_name}Bin = {}\n",
            bytecode.unwrap_or("<none>")
        )
    }
}

fn read(path: &Path) -> Result<String, GenerationError> {
    fs::read_to_string(path)
        .map_err(|e| GenerationError::Rejected(format!("cannot read {}: {e}", path.display())))
}

fn list_dir(dir: &Path) -> Result<Vec<String>, GenerationError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| GenerationError::Rejected(format!("cannot list {}: {e}", dir.display())))?;
    let mut names: Vec<_> =
        entries.flatten().map(|e| e.file_name().to_string_lossy().into_owned()).collect();
    names.sort();
    Ok(names)
}

impl BindingGenerator for RecordingGenerator {
    fn generate(&self, input: &GeneratorInput<'_>) -> Result<(), GenerationError> {
        let abi = read(input.abi)?;
        let bytecode = input.bytecode.map(read).transpose()?;
        let scratch_files = input.abi.parent().map(list_dir).transpose()?.unwrap_or_default();

        self.invocations.lock().expect("invocations lock poisoned").push(Invocation {
            type_name: input.type_name.to_string(),
            package: input.package.to_string(),
            out: input.out.to_path_buf(),
            abi_path: input.abi.to_path_buf(),
            abi: abi.clone(),
            bytecode_path: input.bytecode.map(Path::to_path_buf),
            bytecode: bytecode.clone(),
            scratch_files,
        });

        if self.fail_types.contains(input.type_name) {
            return Err(GenerationError::Rejected(format!("refusing {}", input.type_name)));
        }

        let binding = Self::render(input.package, input.type_name, &abi, bytecode.as_deref());
        fs::write(input.out, binding)
            .map_err(|e| GenerationError::Rejected(format!("cannot write {}: {e}", input.out.display())))
    }
}
