//! Renderer configuration file.
//!
//! # Layout
//!
//! ```yaml
//! directory: templates        # base (unnamespaced) directory
//! extension: tpl              # "" disables the extension
//! folders:                    # namespaced directories, in order
//!   - namespace: emails
//!     path: templates/emails
//! defaults:
//!   all:                      # params for every template
//!     site: BitFrame
//!   templates:                # params for a single template
//!     plates2:
//!       name: X
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! # API pattern
//!
//! As with the rest of the workspace, functions that touch a user-level
//! location have an explicit form (`load`, `save`) and a convenience form
//! (`load_default`) that derives the location from `dirs::config_dir()`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Params;

/// Extension appended to bare template names when none is configured.
pub const DEFAULT_EXTENSION: &str = "tpl";

// ---------------------------------------------------------------------------
// 1. Schema
// ---------------------------------------------------------------------------

/// Everything needed to build a renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<FolderConfig>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// A namespaced search directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub namespace: String,
    pub path: PathBuf,
}

/// Default template parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub all: Params,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, Params>,
}

impl RendererConfig {
    /// The configured extension, falling back to [`DEFAULT_EXTENSION`].
    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    /// Rewrite every relative path as `base.join(path)`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if let Some(dir) = self.directory.take() {
            self.directory = Some(absolutize(base, dir));
        }
        for folder in &mut self.folders {
            let path = std::mem::take(&mut folder.path);
            folder.path = absolutize(base, path);
        }
    }
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

// ---------------------------------------------------------------------------
// 2. Paths
// ---------------------------------------------------------------------------

/// `<config dir>/bitframe/renderer.yaml` — pure, no I/O.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(dir.join("bitframe").join("renderer.yaml"))
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load a configuration file, resolving relative paths against its directory.
///
/// Returns `ConfigError::NotFound` if absent and `ConfigError::Parse` (with
/// the file path) if the YAML is malformed. An empty file yields the default
/// configuration.
pub fn load(path: &Path) -> Result<RendererConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    let mut config: RendererConfig = if contents.trim().is_empty() {
        RendererConfig::default()
    } else {
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?
    };
    if let Some(base) = path.parent() {
        config.resolve_relative_to(base);
    }
    Ok(config)
}

/// `load` from [`default_path`]; `Ok(None)` when no file exists there.
pub fn load_default() -> Result<Option<RendererConfig>, ConfigError> {
    let path = default_path()?;
    if !path.exists() {
        return Ok(None);
    }
    load(&path).map(Some)
}

// ---------------------------------------------------------------------------
// 4. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `config` to `path`.
///
/// Write flow: serialize → `.tmp` sibling → `rename`. Parent directories are
/// created when missing.
pub fn save(path: &Path, config: &RendererConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
