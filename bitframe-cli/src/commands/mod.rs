//! Subcommands and the renderer setup they share.

pub mod paths;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use bitframe_core::{config, ConfigError, RendererConfig};
use bitframe_renderer::Renderer;

use crate::NamespaceArg;

/// Where templates come from: a config file plus command-line overrides.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Renderer config file (YAML). Defaults to <config dir>/bitframe/renderer.yaml
    /// when that file exists.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base template directory. Ignored with a warning if the config sets one.
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Template file extension; an empty string disables it.
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,

    /// Namespaced search path, `NS=DIR`. Repeatable.
    #[arg(long = "namespace", short = 'n', value_name = "NS=DIR")]
    pub namespaces: Vec<NamespaceArg>,
}

impl SourceArgs {
    /// Load the config (explicit or default) and apply command-line paths.
    pub fn build_renderer(&self) -> Result<Renderer> {
        let mut config = self.load_config()?.unwrap_or_default();
        if let Some(ext) = &self.ext {
            config.extension = Some(ext.clone());
        }

        let mut renderer = Renderer::from_config(&config).context("invalid renderer config")?;
        if let Some(dir) = &self.dir {
            // A duplicate base directory is logged by the renderer and skipped.
            renderer.add_path(dir, None)?;
        }
        for ns in &self.namespaces {
            renderer
                .add_path(&ns.path, Some(&ns.namespace))
                .with_context(|| format!("cannot add namespace '{ns}'"))?;
        }
        Ok(renderer)
    }

    fn load_config(&self) -> Result<Option<RendererConfig>> {
        if let Some(path) = &self.config {
            let cfg = config::load(path)
                .with_context(|| format!("failed to load renderer config '{}'", path.display()))?;
            debug!(path = %path.display(), "loaded renderer config");
            return Ok(Some(cfg));
        }
        match config::load_default() {
            Ok(Some(cfg)) => {
                debug!("loaded default renderer config");
                Ok(Some(cfg))
            }
            Ok(None) => {
                debug!("no default renderer config found");
                Ok(None)
            }
            Err(ConfigError::ConfigDirNotFound) => Ok(None),
            Err(e) => Err(e).context("failed to load default renderer config"),
        }
    }
}
