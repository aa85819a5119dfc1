//! The JSON manifest declaring which bindings to generate.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{BindgenError, Result};

/// Manifest describing the hubble-contracts bindings, embedded at compile time.
pub const HUBBLE_MANIFEST: &str = include_str!("../manifests/hubble.json");

/// A batch of bindings to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Directory that artifact paths are relative to
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    /// Output root; wiped before each batch
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// File extension of generated bindings
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Bindings to generate, in declaration order
    pub contracts: Vec<ContractEntry>,
}

/// One binding in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContractEntry {
    /// Artifact JSON path, relative to [`Manifest::artifacts`]
    pub artifact: PathBuf,
    /// Exported type name of the binding
    #[serde(rename = "type")]
    pub type_name: String,
    /// Category directory under the output root. Its length is also stripped from the type
    /// name to form the package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
    /// Never pass bytecode to the generator, even if the artifact has some
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interface_only: bool,
}

fn default_artifacts() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_output() -> PathBuf {
    PathBuf::from("contracts")
}

fn default_extension() -> String {
    "go".to_string()
}

impl Manifest {
    /// Parses manifest JSON. Paths are left as written.
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Loads a manifest file, resolving relative roots against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|source| BindgenError::ManifestRead { path: path.to_path_buf(), source })?;
        let mut manifest = Self::from_json(&content)
            .map_err(|source| BindgenError::ManifestParse { path: path.to_path_buf(), source })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            manifest.artifacts = base.join(&manifest.artifacts);
            manifest.output = base.join(&manifest.output);
        }
        Ok(manifest)
    }

    /// The embedded hubble-contracts manifest, with roots relative to the working directory.
    pub fn hubble() -> Result<Self> {
        Self::from_json(HUBBLE_MANIFEST)
            .map_err(|source| BindgenError::ManifestParse { path: "<builtin>".into(), source })
    }
}
