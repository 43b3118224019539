//! bitframe — render templates from the command line.
//!
//! # Usage
//!
//! ```text
//! bitframe render <name> [--config FILE] [--dir DIR] [--ext EXT]
//!                        [--namespace NS=DIR]... [--data FILE.json] [--set KEY=VALUE]...
//! bitframe paths [--config FILE] [--dir DIR] [--namespace NS=DIR]... [--json]
//! ```

mod commands;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{paths::PathsArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "bitframe",
    version,
    about = "Render templates from a base directory and namespaced search paths",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template to stdout.
    Render(RenderArgs),

    /// List the registered template search paths.
    Paths(PathsArgs),
}

// ---------------------------------------------------------------------------
// Shared arguments — parsed from `NS=DIR` and `KEY=VALUE` strings
// ---------------------------------------------------------------------------

/// A namespaced search path given as `NS=DIR`.
#[derive(Debug, Clone)]
pub struct NamespaceArg {
    pub namespace: String,
    pub path: PathBuf,
}

impl FromStr for NamespaceArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((ns, dir)) if !ns.is_empty() && !dir.is_empty() => Ok(Self {
                namespace: ns.to_string(),
                path: PathBuf::from(dir),
            }),
            _ => Err(format!("invalid namespace '{s}'; expected NS=DIR")),
        }
    }
}

impl fmt::Display for NamespaceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.namespace, self.path.display())
    }
}

/// A render variable given as `KEY=VALUE`.
///
/// VALUE is parsed as JSON when it is valid JSON (`3`, `true`, `[1,2]`),
/// otherwise it is taken as a plain string.
#[derive(Debug, Clone)]
pub struct KeyValueArg {
    pub key: String,
    pub value: serde_json::Value,
}

impl FromStr for KeyValueArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (key, raw) = s
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| format!("invalid variable '{s}'; expected KEY=VALUE"))?;
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        Ok(Self { key: key.to_string(), value })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Paths(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
