//! Tests for the hubble-abigen command line.

use std::{fs, num::NonZeroUsize, path::Path};

use clap::Parser;
use hubble_abigen::{generate, Command, Error, MainCmd};
use hubble_bindgen::{test_utils::RecordingGenerator, BindgenError};
use rstest::rstest;

fn parse(args: &[&str]) -> MainCmd {
    MainCmd::try_parse_from(std::iter::once("hubble-abigen").chain(args.iter().copied())).unwrap()
}

fn generate_cmd(args: &[&str]) -> generate::Cmd {
    let mut full = vec!["generate"];
    full.extend_from_slice(args);
    match parse(&full).command {
        Command::Generate(cmd) => cmd,
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn generate_defaults() {
    let cmd = generate_cmd(&[]);
    let options = cmd.options();
    assert_eq!(options.jobs, NonZeroUsize::MIN);
    assert!(!options.keep_going);
    assert!(options.clean);
    assert_eq!(options.scratch_dir, None);
    assert!(cmd.manifest.manifest.is_none());
}

#[test]
fn generate_flags() {
    let cmd = generate_cmd(&[
        "-j",
        "4",
        "--keep-going",
        "--no-clean",
        "--scratch-dir",
        "/tmp/scratch",
        "--abigen",
        "/opt/abigen",
        "--abigen-arg",
        "--lang",
        "--abigen-arg",
        "go",
        "--out",
        "bindings",
    ]);
    let options = cmd.options();
    assert_eq!(options.jobs.get(), 4);
    assert!(options.keep_going);
    assert!(!options.clean);
    assert_eq!(options.scratch_dir.as_deref(), Some(Path::new("/tmp/scratch")));
    assert_eq!(cmd.abigen, Path::new("/opt/abigen"));
    assert_eq!(cmd.abigen_args, ["--lang", "go"]);
    assert_eq!(cmd.manifest.out.as_deref(), Some(Path::new("bindings")));
}

#[rstest]
#[case(&["generate", "-j", "0"])]
#[case(&["generate", "--bogus"])]
#[case(&["frobnicate"])]
fn rejects_bad_arguments(#[case] args: &[&str]) {
    assert!(MainCmd::try_parse_from(std::iter::once("hubble-abigen").chain(args.iter().copied()))
        .is_err());
}

#[test]
fn verbosity_is_global() {
    let cmd = parse(&["list", "-vvv", "--json"]);
    assert_eq!(cmd.log.verbose, 3);
    assert!(matches!(cmd.command, Command::List(ref list) if list.json));
}

/// Writes a manifest with two contracts next to an artifacts directory.
fn write_project(root: &Path) -> std::path::PathBuf {
    let artifacts = root.join("artifacts/contracts");
    fs::create_dir_all(artifacts.join("Vault.sol")).unwrap();
    fs::create_dir_all(artifacts.join("client/FrontendGeneric.sol")).unwrap();
    fs::write(
        artifacts.join("Vault.sol/Vault.json"),
        r#"{"abi": [{"type": "function", "name": "deposit"}], "bytecode": "0x6080"}"#,
    )
    .unwrap();
    fs::write(
        artifacts.join("client/FrontendGeneric.sol/FrontendGeneric.json"),
        r#"{"abi": [], "bytecode": "0x60a0"}"#,
    )
    .unwrap();

    let manifest = root.join("bindings.json");
    fs::write(
        &manifest,
        r#"{
            "artifacts": "artifacts",
            "output": "contracts",
            "contracts": [
                { "artifact": "contracts/Vault.sol/Vault.json", "type": "Vault" },
                { "artifact": "contracts/client/FrontendGeneric.sol/FrontendGeneric.json",
                  "type": "FrontendGeneric", "subdir": "frontend" }
            ]
        }"#,
    )
    .unwrap();
    manifest
}

#[test]
fn generate_from_manifest_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_project(dir.path());

    let cmd = generate_cmd(&["--manifest", manifest.to_str().unwrap()]);
    let plan = cmd.manifest.plan().unwrap();
    let generator = RecordingGenerator::new();
    let report = cmd.run_with(&plan, &generator).unwrap();

    assert_eq!(
        report.generated,
        [
            dir.path().join("contracts/vault/vault.go"),
            dir.path().join("contracts/frontend/generic/generic.go"),
        ]
    );
    assert_eq!(generator.invoked_types(), ["Vault", "FrontendGeneric"]);
    assert!(report.generated.iter().all(|p| p.is_file()));
}

#[test]
fn missing_manifest_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let cmd = generate_cmd(&["--manifest", missing.to_str().unwrap()]);
    let err = cmd.manifest.plan().unwrap_err();
    assert!(matches!(err, Error::Bindgen(BindgenError::ManifestRead { .. })), "{err}");
}

#[cfg(unix)]
#[test]
fn fake_abigen_end_to_end() {
    use std::os::unix::fs::PermissionsExt;

    const SCRIPT: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    --out) out="$2"; shift ;;
    --pkg) pkg="$2"; shift ;;
    --type) ty="$2"; shift ;;
    --bin) bin="$2"; shift ;;
  esac
  shift
done
if [ "$ty" = "$FAIL_TYPE" ]; then
  echo "cannot bind $ty" >&2
  exit 3
fi
printf 'package %s\n' "$pkg" > "$out"
if [ -n "$bin" ]; then cat "$bin" >> "$out"; fi
exit 0
"#;

    let dir = tempfile::tempdir().unwrap();
    let manifest = write_project(dir.path());
    let script = dir.path().join("fake-abigen.sh");
    fs::write(&script, SCRIPT.replace("$FAIL_TYPE", "NoSuchType")).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let args = ["--manifest", manifest.to_str().unwrap(), "--abigen", script.to_str().unwrap()];
    generate_cmd(&args).run().unwrap();

    let vault = fs::read_to_string(dir.path().join("contracts/vault/vault.go")).unwrap();
    assert_eq!(vault, "package vault\n0x6080");
    let generic =
        fs::read_to_string(dir.path().join("contracts/frontend/generic/generic.go")).unwrap();
    assert_eq!(generic, "package generic\n0x60a0");

    // A failing generator must fail the batch instead of being ignored.
    let failing = dir.path().join("failing-abigen.sh");
    fs::write(&failing, SCRIPT.replace("$FAIL_TYPE", "Vault")).unwrap();
    fs::set_permissions(&failing, fs::Permissions::from_mode(0o755)).unwrap();

    let args = ["--manifest", manifest.to_str().unwrap(), "--abigen", failing.to_str().unwrap()];
    let err = generate_cmd(&args).run().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'Vault'"), "{message}");
    assert!(message.contains("cannot bind Vault"), "{message}");
    assert!(!dir.path().join("contracts/frontend").exists());
}
