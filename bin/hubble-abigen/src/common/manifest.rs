//! Manifest selection shared by all subcommands.

use std::path::PathBuf;

use clap::Args;
use hubble_bindgen::{Manifest, Plan};
use tracing::debug;

use super::Result;

/// Arguments selecting the manifest and overriding its roots
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArgs {
    /// Manifest listing the bindings to generate. Uses the built-in hubble-contracts manifest
    /// if omitted.
    #[arg(short = 'm', long = "manifest", env = "HUBBLE_BINDINGS_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory containing the compiled artifacts, overriding the manifest
    #[arg(long = "artifacts", env = "HUBBLE_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Output root for generated bindings, overriding the manifest. Wiped before generating.
    #[arg(short = 'o', long = "out", env = "HUBBLE_BINDINGS_OUT")]
    pub out: Option<PathBuf>,

    /// File extension of generated bindings, overriding the manifest
    #[arg(long = "extension")]
    pub extension: Option<String>,
}

impl ManifestArgs {
    /// Loads the selected manifest and applies command-line overrides.
    pub fn load(&self) -> Result<Manifest> {
        let mut manifest = match &self.manifest {
            Some(path) => {
                debug!(path = %path.display(), "loading manifest");
                Manifest::load(path)?
            }
            None => Manifest::hubble()?,
        };

        if let Some(artifacts) = &self.artifacts {
            manifest.artifacts = artifacts.clone();
        }
        if let Some(out) = &self.out {
            manifest.output = out.clone();
        }
        if let Some(extension) = &self.extension {
            manifest.extension = extension.clone();
        }
        Ok(manifest)
    }

    /// Loads the manifest and resolves it into a plan.
    pub fn plan(&self) -> Result<Plan> {
        Ok(Plan::from_manifest(&self.load()?)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn overrides_apply_to_builtin_manifest() {
        let args = ManifestArgs {
            artifacts: Some("../hubble-contracts/artifacts".into()),
            out: Some("../contracts".into()),
            extension: Some("rs".to_string()),
            ..Default::default()
        };
        let plan = args.plan().unwrap();
        assert_eq!(plan.out_root(), Path::new("../contracts"));
        assert_eq!(
            plan.requests()[0].artifact,
            Path::new("../hubble-contracts/artifacts/contracts/test/POB.sol/ProofOfBurn.json")
        );
        assert_eq!(plan.requests()[0].out, Path::new("../contracts/proofofburn/proofofburn.rs"));
    }
}
