//! Loading compiled contract artifacts.

use std::{fs, io::ErrorKind, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::{BindgenError, Result};

/// Artifact format shared by Hardhat and Foundry outputs.
///
/// Hardhat stores `bytecode` as a hex string, Foundry as `{ "object": "0x..." }`.
#[derive(Deserialize)]
struct ContractArtifact {
    abi: Value,
    #[serde(default)]
    bytecode: Option<Value>,
}

/// The two halves of an artifact that the generator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactParts {
    /// ABI re-serialized as compact JSON, with the artifact's key order preserved
    pub abi: String,
    /// Bytecode exactly as found in the artifact, `None` for interface-only contracts
    pub bytecode: Option<String>,
}

impl ArtifactParts {
    /// Whether the artifact carries deployable code.
    pub const fn has_bytecode(&self) -> bool {
        self.bytecode.is_some()
    }
}

/// Reads an artifact from disk and splits it into ABI text and bytecode text.
pub fn split_artifact(path: &Path) -> Result<ArtifactParts> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BindgenError::ArtifactNotFound { path: path.to_path_buf() },
        _ => BindgenError::parse(path, e),
    })?;

    parse_artifact(path, &content)
}

/// Splits artifact JSON content. `path` is only used for error reporting.
pub fn parse_artifact(path: &Path, content: &str) -> Result<ArtifactParts> {
    let artifact: ContractArtifact =
        serde_json::from_str(content).map_err(|e| BindgenError::parse(path, e))?;

    if artifact.abi.is_null() {
        return Err(BindgenError::parse(path, "field `abi` is null"));
    }
    let abi = serde_json::to_string(&artifact.abi).map_err(|e| BindgenError::parse(path, e))?;

    let bytecode = match artifact.bytecode {
        None | Some(Value::Null) => None,
        Some(Value::String(hex)) => Some(hex),
        Some(Value::Object(mut object)) => match object.remove("object") {
            Some(Value::String(hex)) => Some(hex),
            _ => {
                return Err(BindgenError::parse(
                    path,
                    "field `bytecode.object` is missing or not a string",
                ))
            }
        },
        Some(other) => {
            return Err(BindgenError::parse(
                path,
                format!("field `bytecode` must be a string, found {}", json_kind(&other)),
            ))
        }
    };

    Ok(ArtifactParts { abi, bytecode })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
