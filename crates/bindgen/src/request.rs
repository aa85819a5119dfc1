//! Generation requests and the batch plan built from a manifest.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{resolve_package_name, BindgenError, ContractEntry, Manifest, Result};

/// A fully resolved request to generate one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Path of the artifact JSON
    pub artifact: PathBuf,
    /// Exported type name
    pub type_name: String,
    /// Package name of the binding
    pub package: String,
    /// Binding file the generator writes
    pub out: PathBuf,
    /// Whether bytecode is withheld from the generator
    pub interface_only: bool,
}

impl GenerationRequest {
    /// Resolves a manifest entry against the artifact and output roots.
    ///
    /// The output path is `<out_root>/[<subdir>/]<package>/<package>.<extension>`.
    pub fn from_entry(
        entry: &ContractEntry,
        artifacts: &Path,
        out_root: &Path,
        extension: &str,
    ) -> Result<Self> {
        let subdir = entry.subdir.as_deref().filter(|s| !s.is_empty());
        let package = resolve_package_name(&entry.type_name, subdir)?;

        let mut out = out_root.to_path_buf();
        if let Some(subdir) = subdir {
            out.push(subdir);
        }
        out.push(&package);
        if extension.is_empty() {
            out.push(&package);
        } else {
            out.push(format!("{package}.{extension}"));
        }

        Ok(Self {
            artifact: artifacts.join(&entry.artifact),
            type_name: entry.type_name.clone(),
            package,
            out,
            interface_only: entry.interface_only,
        })
    }

    /// Directory the binding file lives in.
    pub fn output_dir(&self) -> &Path {
        self.out.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// An ordered batch of requests sharing one output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    out_root: PathBuf,
    requests: Vec<GenerationRequest>,
}

impl Plan {
    /// Creates a plan from already resolved requests.
    pub fn new(out_root: impl Into<PathBuf>, requests: Vec<GenerationRequest>) -> Self {
        Self { out_root: out_root.into(), requests }
    }

    /// Resolves every manifest entry. Fails on the first package name that cannot be derived,
    /// or on two requests sharing a binding file, before anything touches the filesystem.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let requests = manifest
            .contracts
            .iter()
            .map(|entry| {
                GenerationRequest::from_entry(
                    entry,
                    &manifest.artifacts,
                    &manifest.output,
                    &manifest.extension,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        check_unique_outputs(&requests)?;
        Ok(Self::new(&manifest.output, requests))
    }

    /// Output root of the batch.
    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    /// Requests in declaration order.
    pub fn requests(&self) -> &[GenerationRequest] {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the plan has no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Every request must own its binding file.
fn check_unique_outputs(requests: &[GenerationRequest]) -> Result<()> {
    let mut seen: HashMap<&Path, &str> = HashMap::with_capacity(requests.len());
    for request in requests {
        if let Some(first) = seen.insert(&request.out, &request.type_name) {
            return Err(BindgenError::DuplicateOutput {
                path: request.out.clone(),
                first: first.to_string(),
                second: request.type_name.clone(),
            });
        }
    }
    Ok(())
}
