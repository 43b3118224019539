//! The [`Renderer`] adapter and the [`TemplateRenderer`] interface it
//! implements.
//!
//! The renderer owns one [`Engine`] and forwards to it after validating
//! arguments. It is not safe for concurrent configuration changes: mutating
//! calls take `&mut self`, and callers sharing a renderer across threads must
//! serialize them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use bitframe_core::{Params, RendererConfig, Scope, TemplatePath, DEFAULT_EXTENSION};

use crate::engine::Engine;
use crate::error::RenderError;

/// Logged when a second un-namespaced path is added.
pub const DUPLICATE_PATH_WARNING: &str =
    "cannot add duplicate un-namespaced path to the template renderer";

// ---------------------------------------------------------------------------
// PathOutcome
// ---------------------------------------------------------------------------

/// What [`Renderer::add_path`] did with the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// The path became the base directory.
    SetDirectory,
    /// The path was registered under its namespace.
    AddedNamespace,
    /// A base directory already existed; nothing changed.
    IgnoredDuplicate,
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOutcome::SetDirectory => write!(f, "set default template directory"),
            PathOutcome::AddedNamespace => write!(f, "added namespaced template path"),
            PathOutcome::IgnoredDuplicate => f.write_str(DUPLICATE_PATH_WARNING),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Interface a host application renders through, independent of the engine
/// behind it.
pub trait TemplateRenderer {
    /// Render the template identified by `name` with `data` layered over any
    /// registered defaults.
    fn render(&self, name: &str, data: &Params) -> Result<String, RenderError>;

    /// Register default params for every template or for one template.
    fn add_default_param(&mut self, scope: Scope, params: Params) -> Result<(), RenderError>;

    /// Register a search path, optionally under a namespace.
    fn add_path(&mut self, path: &Path, namespace: Option<&str>) -> Result<PathOutcome, RenderError>;

    /// Registered search paths: the base directory first, then namespaces.
    fn paths(&self) -> Vec<TemplatePath>;
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Adapter over a file-based [`Engine`].
///
/// Create once while composing the application, configure it with
/// [`add_path`](Self::add_path) and
/// [`add_default_param`](Self::add_default_param), then render many times.
pub struct Renderer {
    engine: Engine,
}

impl Renderer {
    /// A renderer using the `tpl` extension and no defaults.
    ///
    /// `directory` may be `None` (set later with [`add_path`](Self::add_path))
    /// and does not need to exist yet.
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self::with_options(directory, DEFAULT_EXTENSION, Params::new())
    }

    /// A renderer with an explicit extension (`""` disables it) and defaults
    /// applied to every template.
    pub fn with_options(directory: Option<PathBuf>, extension: &str, defaults: Params) -> Self {
        let mut engine = Engine::new(directory, Some(extension));
        if !defaults.is_empty() {
            engine.add_data(defaults, None);
        }
        Renderer { engine }
    }

    /// Load the configuration file at `path` and build a renderer from it.
    pub fn from_config_file(path: &Path) -> Result<Self, RenderError> {
        let config = bitframe_core::config::load(path)?;
        Self::from_config(&config)
    }

    /// Build a renderer from a loaded configuration file.
    pub fn from_config(config: &RendererConfig) -> Result<Self, RenderError> {
        let mut renderer = Self::with_options(
            config.directory.clone(),
            config.extension(),
            config.defaults.all.clone(),
        );
        for folder in &config.folders {
            renderer.add_path(&folder.path, Some(&folder.namespace))?;
        }
        for (template, params) in &config.defaults.templates {
            renderer.add_default_param(Scope::template(template.as_str()), params.clone())?;
        }
        Ok(renderer)
    }

    /// Render `name`, or fail with [`RenderError::NotFound`] before any
    /// rendering when `name` is empty or resolves to no file.
    pub fn render(&self, name: &str, data: &Params) -> Result<String, RenderError> {
        if name.is_empty() || !self.engine.exists(name) {
            return Err(RenderError::NotFound(name.to_string()));
        }
        Ok(self.engine.render(name, data)?)
    }

    /// [`render`](Self::render) with any value serializing to a map.
    pub fn render_serialize<T>(&self, name: &str, data: &T) -> Result<String, RenderError>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(data)? {
            Value::Object(params) => self.render(name, &params),
            Value::Null => self.render(name, &Params::new()),
            other => Err(RenderError::InvalidArgument(format!(
                "render data must serialize to a map; received {}",
                json_type(&other)
            ))),
        }
    }

    /// Register default params for `scope`.
    ///
    /// Fails with [`RenderError::InvalidArgument`] for an empty template name
    /// or an empty `params` map.
    pub fn add_default_param(&mut self, scope: Scope, params: Params) -> Result<(), RenderError> {
        if scope.template_name() == Some("") {
            return Err(RenderError::InvalidArgument(
                "template name must be a non-empty string; received an empty string".to_string(),
            ));
        }
        if params.is_empty() {
            return Err(RenderError::InvalidArgument(format!(
                "params for {scope} must be a non-empty map; received an empty map"
            )));
        }
        self.engine.add_data(params, scope.template_name());
        Ok(())
    }

    /// Register a search path.
    ///
    /// Without a namespace the path becomes the base directory, unless one is
    /// already set: then a warning is logged and nothing changes. With a
    /// namespace the path is added as a folder that falls back to the base
    /// directory; re-using a namespace fails with an engine error.
    pub fn add_path(
        &mut self,
        path: impl Into<PathBuf>,
        namespace: Option<&str>,
    ) -> Result<PathOutcome, RenderError> {
        let path = path.into();
        match namespace.filter(|ns| !ns.is_empty()) {
            None => {
                if let Some(existing) = self.engine.directory() {
                    warn!(
                        path = %path.display(),
                        existing = %existing.display(),
                        "{DUPLICATE_PATH_WARNING}"
                    );
                    return Ok(PathOutcome::IgnoredDuplicate);
                }
                self.engine.set_directory(path);
                Ok(PathOutcome::SetDirectory)
            }
            Some(ns) => {
                self.engine.add_folder(ns, path, true)?;
                debug!(namespace = ns, "added namespaced template path");
                Ok(PathOutcome::AddedNamespace)
            }
        }
    }

    /// The base directory (if set) followed by every namespaced folder, read
    /// from the engine on each call.
    pub fn paths(&self) -> Vec<TemplatePath> {
        let mut paths = Vec::with_capacity(self.engine.folders().len() + 1);
        if let Some(dir) = self.engine.directory() {
            paths.push(TemplatePath::unnamespaced(dir));
        }
        for folder in self.engine.folders() {
            paths.push(TemplatePath::new(
                folder.path(),
                Some(folder.namespace().to_string()),
            ));
        }
        paths
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

impl TemplateRenderer for Renderer {
    fn render(&self, name: &str, data: &Params) -> Result<String, RenderError> {
        Renderer::render(self, name, data)
    }

    fn add_default_param(&mut self, scope: Scope, params: Params) -> Result<(), RenderError> {
        Renderer::add_default_param(self, scope, params)
    }

    fn add_path(&mut self, path: &Path, namespace: Option<&str>) -> Result<PathOutcome, RenderError> {
        Renderer::add_path(self, path, namespace)
    }

    fn paths(&self) -> Vec<TemplatePath> {
        Renderer::paths(self)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
