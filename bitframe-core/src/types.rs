//! Value types shared by the renderer, its configuration and the CLI.
//!
//! Filesystem locations are always `PathBuf`; namespaces and template names
//! are plain strings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Variables handed to a template, keyed by variable name.
pub type Params = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// TemplatePath
// ---------------------------------------------------------------------------

/// One registered template search directory, optionally tagged with the
/// namespace used to address it (`namespace::name`).
///
/// Two paths are equal when both the directory and the namespace match.
/// `Display` prints the directory only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplatePath {
    path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

impl TemplatePath {
    pub fn new(path: impl Into<PathBuf>, namespace: Option<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    /// An unnamespaced path, i.e. the base directory.
    pub fn unnamespaced(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Which templates a set of default parameters applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every template rendered by the renderer.
    AllTemplates,
    /// Only the template with this identifier.
    Template(String),
}

impl Scope {
    pub fn template(name: impl Into<String>) -> Self {
        Scope::Template(name.into())
    }

    /// The template identifier, or `None` for [`Scope::AllTemplates`].
    pub fn template_name(&self) -> Option<&str> {
        match self {
            Scope::AllTemplates => None,
            Scope::Template(name) => Some(name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::AllTemplates => write!(f, "all templates"),
            Scope::Template(name) => write!(f, "template '{name}'"),
        }
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        Scope::Template(s.to_owned())
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        Scope::Template(s)
    }
}
