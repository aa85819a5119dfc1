use std::{num::NonZeroUsize, path::PathBuf, time::Instant};

use clap::Parser;
use hubble_bindgen::{Abigen, BatchOptions, BatchReport, BindingGenerator, Driver, Plan};
use tracing::info;

use crate::common::{ManifestArgs, Result};

/// Generate bindings for every contract in the manifest
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Manifest selection
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Binding generator executable, invoked with `--abi --bin --pkg --type --out`
    #[arg(long = "abigen", env = "ABIGEN", default_value = "abigen")]
    pub abigen: PathBuf,

    /// Extra argument appended to every generator invocation. May be repeated.
    #[arg(long = "abigen-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub abigen_args: Vec<String>,

    /// Number of bindings generated concurrently
    #[arg(short = 'j', long = "jobs", default_value = "1")]
    pub jobs: NonZeroUsize,

    /// Keep going after a failed binding and report all failures at the end
    #[arg(long = "keep-going", alias = "no-fail-fast")]
    pub keep_going: bool,

    /// Do not wipe the output root before generating
    #[arg(long = "no-clean")]
    pub no_clean: bool,

    /// Directory in which per-binding scratch directories are created
    #[arg(long = "scratch-dir")]
    pub scratch_dir: Option<PathBuf>,
}

impl Cmd {
    /// Runs the batch with the configured `abigen` executable.
    pub fn run(&self) -> Result<()> {
        let plan = self.manifest.plan()?;
        let generator = Abigen::new(&self.abigen).with_extra_args(&self.abigen_args);

        let start = Instant::now();
        let report = self.run_with(&plan, generator)?;
        info!(elapsed = ?start.elapsed(), "batch finished");

        println!(
            "Generated {} bindings in {}",
            report.generated.len(),
            plan.out_root().display()
        );
        Ok(())
    }

    /// Runs the batch for `plan` against an arbitrary generator.
    pub fn run_with<G: BindingGenerator>(&self, plan: &Plan, generator: G) -> Result<BatchReport> {
        let driver = Driver::new(generator).with_options(self.options());
        Ok(driver.run_batch(plan)?)
    }

    /// Batch options selected on the command line.
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            jobs: self.jobs,
            keep_going: self.keep_going,
            clean: !self.no_clean,
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}
