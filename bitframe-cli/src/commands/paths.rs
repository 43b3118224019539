//! `bitframe paths` — list registered template search paths.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use bitframe_core::TemplatePath;

use super::SourceArgs;

/// Arguments for `bitframe paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PathRow {
    #[tabled(rename = "namespace")]
    namespace: String,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "exists")]
    exists: String,
}

impl PathsArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.source.build_renderer()?;
        let paths = renderer.paths();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&paths).context("failed to serialize paths JSON")?
            );
            return Ok(());
        }

        print_table(&paths);
        Ok(())
    }
}

fn print_table(paths: &[TemplatePath]) {
    if paths.is_empty() {
        println!("No template paths registered.");
        return;
    }

    let rows: Vec<PathRow> = paths
        .iter()
        .map(|tp| PathRow {
            namespace: match tp.namespace() {
                Some(ns) => ns.to_string(),
                None => "(default)".bright_black().to_string(),
            },
            path: tp.to_string(),
            exists: if tp.path().is_dir() {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
