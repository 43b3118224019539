//! `bitframe render <name>` — render one template to stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use bitframe_core::Params;

use super::SourceArgs;
use crate::KeyValueArg;

/// Arguments for `bitframe render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template identifier, e.g. `home` or `mail::welcome`.
    pub name: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// JSON file holding an object of render variables.
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Render variable, `KEY=VALUE`; overrides `--data`. Repeatable.
    #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
    pub vars: Vec<KeyValueArg>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.build_renderer()?;
        let params = self.params()?;

        let output = renderer
            .render(&self.name, &params)
            .with_context(|| format!("failed to render '{}'", self.name))?;

        print!("{output}");
        Ok(())
    }

    fn params(&self) -> Result<Params> {
        let mut params = match &self.data {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read data file '{}'", path.display()))?;
                match serde_json::from_str::<serde_json::Value>(&raw)
                    .with_context(|| format!("invalid JSON in '{}'", path.display()))?
                {
                    serde_json::Value::Object(map) => map,
                    _ => bail!("data file '{}' must hold a JSON object", path.display()),
                }
            }
            None => Params::new(),
        };
        for var in &self.vars {
            params.insert(var.key.clone(), var.value.clone());
        }
        Ok(params)
    }
}
