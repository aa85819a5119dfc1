use std::fmt::Write;

use clap::Parser;
use hubble_bindgen::Plan;
use serde_json::json;

use crate::common::{ManifestArgs, Result};

/// Print the resolved generation plan without touching the filesystem
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Manifest selection
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Print the plan as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl Cmd {
    /// Execute the list command
    pub fn run(&self) -> Result<()> {
        let plan = self.manifest.plan()?;
        if self.json {
            println!("{}", render_json(&plan)?);
        } else {
            print!("{}", render_table(&plan));
        }
        Ok(())
    }
}

/// Renders one line per request: type, package, output path and artifact.
pub fn render_table(plan: &Plan) -> String {
    let type_width = plan.requests().iter().map(|r| r.type_name.len()).max().unwrap_or(0);
    let package_width = plan.requests().iter().map(|r| r.package.len()).max().unwrap_or(0);

    let mut out = String::new();
    for request in plan.requests() {
        let _ = writeln!(
            out,
            "{:<type_width$}  {:<package_width$}  {}  <- {}{}",
            request.type_name,
            request.package,
            request.out.display(),
            request.artifact.display(),
            if request.interface_only { "  (interface only)" } else { "" },
        );
    }
    out
}

/// Renders the plan as a pretty-printed JSON document.
pub fn render_json(plan: &Plan) -> Result<String> {
    let requests: Vec<_> = plan
        .requests()
        .iter()
        .map(|r| {
            json!({
                "type": r.type_name,
                "package": r.package,
                "artifact": r.artifact,
                "out": r.out,
                "interfaceOnly": r.interface_only,
            })
        })
        .collect();
    let doc = json!({ "output": plan.out_root(), "requests": requests });
    Ok(serde_json::to_string_pretty(&doc)?)
}
