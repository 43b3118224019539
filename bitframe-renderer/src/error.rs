//! Error types for bitframe-renderer.

use std::path::PathBuf;

use thiserror::Error;

use bitframe_core::ConfigError;

/// Errors raised by the [`Engine`](crate::Engine) while resolving or
/// rendering a template.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("template name must not be empty")]
    EmptyName,

    #[error("template folder namespace must not be empty")]
    EmptyNamespace,

    /// `a::b::c` — the separator may appear at most once.
    #[error("template name '{0}' uses the namespace separator '::' more than once")]
    MultipleSeparators(String),

    #[error("template folder '{0}' is not registered")]
    UnknownFolder(String),

    #[error("template folder '{0}' is already registered")]
    FolderExists(String),

    /// An unnamespaced name was used before a base directory was set.
    #[error("template name '{0}' cannot be resolved: no default directory has been set")]
    NoDirectory(String),

    #[error("template '{name}' does not exist at {path}")]
    Missing { name: String, path: PathBuf },

    /// Tera compile or render failure (syntax error, undefined variable, ...).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while reading template files.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// All errors surfaced by the [`Renderer`](crate::Renderer) adapter.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Empty template name, or a name none of the search paths can resolve.
    #[error("template not found: '{0}'")]
    NotFound(String),

    /// A caller-side validation failure; fix the call site.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("renderer configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Render data could not be converted to template parameters.
    #[error("render data serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
