//! Error types for binding generation.

use std::{fmt, path::PathBuf, process::ExitStatus};

/// Failure while deriving a package name from an exported type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackageNameError {
    /// The prefix consumes the whole type name, leaving nothing to name the package.
    #[error("prefix '{prefix}' ({prefix_len} bytes) leaves no package name for type '{type_name}'")]
    PrefixTooLong {
        /// The exported type name
        type_name: String,
        /// The subdirectory prefix
        prefix: String,
        /// Length of the prefix in bytes
        prefix_len: usize,
    },
    /// Stripping the prefix length would split a multi-byte character.
    #[error("prefix '{prefix}' does not end on a character boundary of type '{type_name}'")]
    NotCharBoundary {
        /// The exported type name
        type_name: String,
        /// The subdirectory prefix
        prefix: String,
    },
}

/// Failure reported by a [`BindingGenerator`](crate::BindingGenerator).
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The generator process could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
    /// The generator ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        /// The program that failed
        program: String,
        /// Exit status reported by the process
        status: ExitStatus,
        /// Captured standard error, trimmed
        stderr: String,
    },
    /// A non-process generator rejected the input.
    #[error("{0}")]
    Rejected(String),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Error types for the binding generator driver.
///
/// Every variant is fatal to the batch it occurs in.
#[derive(Debug, thiserror::Error)]
pub enum BindgenError {
    /// The artifact JSON file does not exist
    #[error("artifact not found: {}", .path.display())]
    ArtifactNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The artifact could not be read or lacks the expected fields
    #[error("failed to parse artifact '{}': {reason}", .path.display())]
    ArtifactParse {
        /// Artifact path
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The manifest could not be read
    #[error("failed to read manifest '{}': {source}", .path.display())]
    ManifestRead {
        /// Manifest path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The manifest is not a valid request list
    #[error("failed to parse manifest '{}': {source}", .path.display())]
    ManifestParse {
        /// Manifest path, or `<builtin>` for the embedded manifest
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// A package name could not be derived for a request
    #[error("invalid package name: {0}")]
    PackageName(#[from] PackageNameError),

    /// The external generator failed for a request
    #[error("binding generation failed for '{type_name}': {source}")]
    Generation {
        /// Exported type name of the failed request
        type_name: String,
        /// What the generator reported
        source: GenerationError,
    },

    /// A filesystem operation on scratch or output paths failed
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        /// Short description of the attempted operation
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Two requests resolve to the same binding file
    #[error("types '{first}' and '{second}' both generate '{}'", .path.display())]
    DuplicateOutput {
        /// The shared binding file
        path: PathBuf,
        /// Type name of the earlier request
        first: String,
        /// Type name of the later request
        second: String,
    },

    /// The output root is not a directory that may be wiped
    #[error("refusing to clean output root '{}'", .path.display())]
    UnsafeOutputRoot {
        /// The rejected output root
        path: PathBuf,
    },

    /// Wiping the output root would delete an input artifact
    #[error("refusing to clean output root '{}': it contains artifact '{}'", .path.display(), .artifact.display())]
    OutputRootContainsArtifact {
        /// The rejected output root
        path: PathBuf,
        /// An artifact under that root
        artifact: PathBuf,
    },

    /// The worker pool for parallel generation could not be started
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// One or more requests failed while running with keep-going
    #[error("{} of {total} bindings failed:\n{}", .failures.len(), FailureList(.failures))]
    Batch {
        /// Number of requests in the batch
        total: usize,
        /// Errors of the failed requests, in declaration order
        failures: Vec<BindgenError>,
    },
}

impl BindgenError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { action, path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::ArtifactParse { path: path.into(), reason: reason.to_string() }
    }
}

struct FailureList<'a>(&'a [BindgenError]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {failure}")?;
        }
        Ok(())
    }
}

/// Result type alias for binding generation
pub type Result<T> = std::result::Result<T, BindgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_error_lists_each_failure() {
        let err = BindgenError::Batch {
            total: 3,
            failures: vec![
                BindgenError::ArtifactNotFound { path: "a/Vault.json".into() },
                BindgenError::Generation {
                    type_name: "Rollup".to_string(),
                    source: GenerationError::Rejected("boom".to_string()),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 of 3 bindings failed:\n  - artifact not found: a/Vault.json\n  - binding generation failed for 'Rollup': boom"
        );
    }
}
