//! Batch driver: splits artifacts into scratch files and runs the generator on them.

use std::{
    fs,
    io::ErrorKind,
    num::NonZeroUsize,
    path::{Component, Path, PathBuf},
};

use rayon::prelude::*;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::{
    split_artifact, BindgenError, BindingGenerator, GenerationRequest, GeneratorInput, Plan, Result,
};

/// File name of the ABI extract inside a request's scratch directory.
pub const ABI_SCRATCH: &str = "contract.abi";
/// File name of the bytecode extract inside a request's scratch directory.
pub const BIN_SCRATCH: &str = "contract.bin";

/// How a batch is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Number of requests generated concurrently
    pub jobs: NonZeroUsize,
    /// Attempt every request and report all failures instead of stopping at the first
    pub keep_going: bool,
    /// Wipe the output root before generating
    pub clean: bool,
    /// Parent directory for per-request scratch directories, system temp dir if unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { jobs: NonZeroUsize::MIN, keep_going: false, clean: true, scratch_dir: None }
    }
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Binding files produced, in declaration order
    pub generated: Vec<PathBuf>,
}

/// Runs generation requests against a [`BindingGenerator`].
#[derive(Debug)]
pub struct Driver<G> {
    generator: G,
    options: BatchOptions,
}

impl<G: BindingGenerator> Driver<G> {
    /// Creates a driver with default options: sequential, fail-fast, clean output root.
    pub fn new(generator: G) -> Self {
        Self { generator, options: BatchOptions::default() }
    }

    /// Replaces the batch options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// The batch options in use.
    pub const fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// The wrapped generator.
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Generates a single binding.
    ///
    /// The output directory is created first, then the artifact is split into a fresh scratch
    /// directory that is removed once the generator returns.
    pub fn generate_one(&self, request: &GenerationRequest) -> Result<()> {
        info!(
            type_name = %request.type_name,
            package = %request.package,
            out = %request.out.display(),
            "generating binding"
        );

        let out_dir = request.output_dir();
        fs::create_dir_all(out_dir)
            .map_err(|e| BindgenError::io("create output directory", out_dir, e))?;

        let parts = split_artifact(&request.artifact)?;

        let scratch = self.scratch_dir()?;
        let abi_path = scratch.path().join(ABI_SCRATCH);
        fs::write(&abi_path, &parts.abi)
            .map_err(|e| BindgenError::io("write ABI scratch file", &abi_path, e))?;

        let bytecode = match parts.bytecode.as_deref() {
            Some(hex) if !request.interface_only => {
                let bin_path = scratch.path().join(BIN_SCRATCH);
                fs::write(&bin_path, hex)
                    .map_err(|e| BindgenError::io("write bytecode scratch file", &bin_path, e))?;
                Some(bin_path)
            }
            _ => None,
        };
        debug!(scratch = %scratch.path().display(), has_bytecode = bytecode.is_some(), "scratch ready");

        let input = GeneratorInput {
            abi: &abi_path,
            bytecode: bytecode.as_deref(),
            package: &request.package,
            type_name: &request.type_name,
            out: &request.out,
        };
        self.generator.generate(&input).map_err(|source| BindgenError::Generation {
            type_name: request.type_name.clone(),
            source,
        })?;

        let scratch_path = scratch.path().to_path_buf();
        scratch.close().map_err(|e| BindgenError::io("remove scratch directory", scratch_path, e))
    }

    /// Runs every request of `plan`.
    ///
    /// The output root is wiped first unless [`BatchOptions::clean`] is off. A root that holds
    /// any of the plan's artifacts is never wiped. Without `keep_going` the first failure aborts
    /// the batch and no later request is started.
    pub fn run_batch(&self, plan: &Plan) -> Result<BatchReport> {
        if self.options.clean {
            if let Some(request) =
                plan.requests().iter().find(|r| is_within(&r.artifact, plan.out_root()))
            {
                return Err(BindgenError::OutputRootContainsArtifact {
                    path: plan.out_root().to_path_buf(),
                    artifact: request.artifact.clone(),
                });
            }
            clean_output_root(plan.out_root())?;
        }
        fs::create_dir_all(plan.out_root())
            .map_err(|e| BindgenError::io("create output root", plan.out_root(), e))?;

        info!(
            requests = plan.len(),
            jobs = self.options.jobs.get(),
            keep_going = self.options.keep_going,
            "starting batch"
        );

        if self.options.jobs.get() == 1 {
            self.run_sequential(plan)?;
        } else {
            self.run_parallel(plan)?;
        }

        Ok(BatchReport { generated: plan.requests().iter().map(|r| r.out.clone()).collect() })
    }

    fn run_sequential(&self, plan: &Plan) -> Result<()> {
        if !self.options.keep_going {
            return plan.requests().iter().try_for_each(|request| self.generate_one(request));
        }
        let results: Vec<_> = plan.requests().iter().map(|r| self.generate_one(r)).collect();
        collect_failures(plan.len(), results)
    }

    fn run_parallel(&self, plan: &Plan) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.get())
            .thread_name(|i| format!("abigen-worker-{i}"))
            .build()?;

        pool.install(|| {
            if !self.options.keep_going {
                return plan.requests().par_iter().try_for_each(|r| self.generate_one(r));
            }
            let results: Vec<_> = plan.requests().par_iter().map(|r| self.generate_one(r)).collect();
            collect_failures(plan.len(), results)
        })
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("hubble-abigen-");
        match &self.options.scratch_dir {
            Some(parent) => builder
                .tempdir_in(parent)
                .map_err(|e| BindgenError::io("create scratch directory in", parent, e)),
            None => builder
                .tempdir()
                .map_err(|e| BindgenError::io("create scratch directory in", std::env::temp_dir(), e)),
        }
    }
}

fn collect_failures(total: usize, results: Vec<Result<()>>) -> Result<()> {
    let failures: Vec<_> = results.into_iter().filter_map(|r| r.err()).collect();
    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        warn!(%failure, "binding failed");
    }
    Err(BindgenError::Batch { total, failures })
}

/// Whether `path` lies under `root`, compared as written and, when both exist, canonicalized.
fn is_within(path: &Path, root: &Path) -> bool {
    if path.starts_with(root) {
        return true;
    }
    match (fs::canonicalize(path), fs::canonicalize(root)) {
        (Ok(path), Ok(root)) => path.starts_with(root),
        _ => false,
    }
}

/// Recursively deletes the output root. A missing root is not an error.
///
/// Paths made only of `/`, `.` and `..` components are refused.
pub fn clean_output_root(root: &Path) -> Result<()> {
    let names_nothing = root.components().all(|c| {
        matches!(c, Component::RootDir | Component::CurDir | Component::ParentDir | Component::Prefix(_))
    });
    if names_nothing {
        return Err(BindgenError::UnsafeOutputRoot { path: root.to_path_buf() });
    }

    match fs::remove_dir_all(root) {
        Ok(()) => {
            debug!(root = %root.display(), "cleaned output root");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BindgenError::io("remove output root", root, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_clean_roots_naming_nothing() {
        for root in ["", "/", ".", "..", "./..", "/.."] {
            assert!(
                matches!(
                    clean_output_root(Path::new(root)),
                    Err(BindgenError::UnsafeOutputRoot { .. })
                ),
                "{root:?}"
            );
        }
    }

    #[test]
    fn artifacts_under_root_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("artifacts/Vault.json");
        fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        fs::write(&artifact, "{}").unwrap();

        assert!(is_within(&artifact, dir.path()));
        assert!(is_within(&artifact, &dir.path().join("artifacts/../artifacts")));
        assert!(is_within(
            Path::new("hubble-contracts/artifacts/Vault.json"),
            Path::new("hubble-contracts")
        ));
        assert!(!is_within(&artifact, &dir.path().join("contracts")));
        assert!(!is_within(Path::new("artifacts/Vault.json"), Path::new("artifacts-out")));
    }

    #[test]
    fn cleaning_missing_root_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        clean_output_root(&dir.path().join("contracts")).unwrap();
    }

    #[test]
    fn cleaning_removes_stale_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("contracts");
        fs::create_dir_all(root.join("old")).unwrap();
        fs::write(root.join("old/old.go"), "package old").unwrap();

        clean_output_root(&root).unwrap();
        assert!(!root.exists());
    }
}
