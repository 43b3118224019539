//! Error types for bitframe-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or saving renderer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, unreadable file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse renderer config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file did not exist.
    #[error("renderer config not found at {path}")]
    NotFound { path: PathBuf },

    /// `dirs::config_dir()` returned `None`.
    #[error("cannot determine the user config directory; set $HOME or $XDG_CONFIG_HOME")]
    ConfigDirNotFound,
}
