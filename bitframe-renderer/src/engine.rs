//! File-based template engine — [`Engine`] and its namespaced [`Folder`]s.
//!
//! # Resolution
//!
//! | Identifier       | File                                                    |
//! |------------------|---------------------------------------------------------|
//! | `page`           | `<directory>/page.<ext>`                                |
//! | `partials/head`  | `<directory>/partials/head.<ext>`                       |
//! | `mail::welcome`  | `<folder mail>/welcome.<ext>`, else `<directory>/welcome.<ext>` when the folder falls back |
//!
//! Template files are read from disk on every render; tera compiles and
//! renders them. Every template under the registered directories is loaded
//! alongside the requested one so `{% include %}` and `{% extends %}` can
//! reference any of them by identifier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;
use tracing::{debug, warn};

use bitframe_core::Params;

use crate::context::{to_tera_context, TemplateData};
use crate::error::EngineError;
use crate::name::{TemplateName, NAMESPACE_SEPARATOR};

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io { path: path.into(), source }
}

fn normalize_extension(extension: Option<&str>) -> Option<String> {
    extension
        .map(|ext| ext.trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
}

/// Identifier for a file relative to its search directory: `/` separated,
/// with the extension stripped.
fn template_identifier(rel: &Path, extension: Option<&str>) -> Option<String> {
    let rel = rel.to_string_lossy().replace('\\', "/");
    match extension {
        Some(ext) => rel
            .strip_suffix(&format!(".{ext}"))
            .filter(|stem| !stem.is_empty())
            .map(str::to_string),
        None => Some(rel),
    }
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), EngineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn read_template(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}

/// `(identifier, source)` for every template file under `dir`.
fn load_templates(dir: &Path, extension: Option<&str>) -> Result<Vec<(String, String)>, EngineError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let Some(name) = template_identifier(rel, extension) else {
            continue;
        };
        // Siblings are only loaded so includes can find them; an unreadable
        // one must not fail the render of another template.
        match read_template(&path) {
            Ok(source) => templates.push((name, source)),
            Err(err) => debug!(path = %path.display(), error = %err, "skipping unreadable template file"),
        }
    }
    Ok(templates)
}

/// Register `siblings` on `tera`, skipping any that fail to parse or whose
/// parent template cannot be loaded.
///
/// Each attempt runs on a clone so a rejected template never stays behind in
/// `tera`. Templates are retried until no further one can be added, so a
/// child listed before its parent still loads.
fn register_siblings(tera: &mut Tera, siblings: Vec<(String, String)>) {
    let mut bulk = tera.clone();
    let all = siblings.iter().map(|(name, source)| (name.as_str(), source.as_str()));
    if bulk.add_raw_templates(all).is_ok() {
        *tera = bulk;
        return;
    }

    let mut pending = siblings;
    loop {
        let before = pending.len();
        let mut rejected = Vec::new();
        for (name, source) in pending {
            let mut trial = tera.clone();
            match trial.add_raw_template(&name, &source) {
                Ok(()) => *tera = trial,
                Err(err) => rejected.push((name, source, err)),
            }
        }
        if rejected.is_empty() {
            return;
        }
        if rejected.len() == before {
            for (name, _, err) in rejected {
                warn!(template = %name, error = %err, "skipping template that failed to load");
            }
            return;
        }
        pending = rejected.into_iter().map(|(name, source, _)| (name, source)).collect();
    }
}

fn namespaced(namespace: &str, name: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{name}")
}

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

/// A namespaced search directory.
///
/// With `fallback` set, identifiers in this namespace that have no file in
/// the folder resolve against the engine's base directory instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    namespace: String,
    path: PathBuf,
    fallback: bool,
}

impl Folder {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Tera-backed engine resolving identifiers against a base directory and
/// namespaced folders.
///
/// Configuration methods take `&mut self`; rendering takes `&self`.
pub struct Engine {
    tera: Tera,
    directory: Option<PathBuf>,
    extension: Option<String>,
    folders: Vec<Folder>,
    data: TemplateData,
}

impl Engine {
    /// Construct an engine. Neither the directory nor its existence is
    /// required; an empty extension means names are used as file names.
    pub fn new(directory: Option<PathBuf>, extension: Option<&str>) -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Engine {
            tera,
            directory,
            extension: normalize_extension(extension),
            folders: Vec::new(),
            data: TemplateData::new(),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        debug!(path = %directory.display(), "set default template directory");
        self.directory = Some(directory);
    }

    pub fn file_extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn set_file_extension(&mut self, extension: Option<&str>) {
        self.extension = normalize_extension(extension);
    }

    // -- folders ------------------------------------------------------------

    /// Register `path` under `namespace`.
    ///
    /// Fails with [`EngineError::FolderExists`] if the namespace is taken;
    /// the existing folder is kept.
    pub fn add_folder(
        &mut self,
        namespace: &str,
        path: impl Into<PathBuf>,
        fallback: bool,
    ) -> Result<(), EngineError> {
        if namespace.is_empty() {
            return Err(EngineError::EmptyNamespace);
        }
        if self.folder(namespace).is_some() {
            return Err(EngineError::FolderExists(namespace.to_string()));
        }
        let path = path.into();
        debug!(namespace, path = %path.display(), fallback, "registered template folder");
        self.folders.push(Folder {
            namespace: namespace.to_string(),
            path,
            fallback,
        });
        Ok(())
    }

    pub fn remove_folder(&mut self, namespace: &str) -> Option<Folder> {
        let idx = self.folders.iter().position(|f| f.namespace == namespace)?;
        Some(self.folders.remove(idx))
    }

    pub fn folder(&self, namespace: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.namespace == namespace)
    }

    /// Registered folders in insertion order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    // -- data ---------------------------------------------------------------

    /// Merge default params for one template, or for all when `None`.
    pub fn add_data(&mut self, params: Params, template: Option<&str>) {
        self.data.add(params, template);
    }

    /// Defaults that apply to `template` (shared only when `None`).
    pub fn data(&self, template: Option<&str>) -> Params {
        self.data.get(template)
    }

    // -- resolution ---------------------------------------------------------

    /// File that `name` resolves to. The file itself may not exist.
    pub fn path(&self, name: &str) -> Result<PathBuf, EngineError> {
        let parsed = TemplateName::parse(name)?;
        let file = parsed.file_name(self.file_extension());
        let Some(namespace) = parsed.namespace() else {
            let dir = self
                .directory
                .as_ref()
                .ok_or_else(|| EngineError::NoDirectory(name.to_string()))?;
            return Ok(dir.join(file));
        };

        let folder = self
            .folder(namespace)
            .ok_or_else(|| EngineError::UnknownFolder(namespace.to_string()))?;
        let path = folder.path.join(&file);
        if !path.is_file() && folder.fallback {
            if let Some(dir) = &self.directory {
                let fallback = dir.join(&file);
                if fallback.is_file() {
                    return Ok(fallback);
                }
            }
        }
        Ok(path)
    }

    /// Whether `name` resolves to an existing file.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    // -- rendering ----------------------------------------------------------

    /// Render `name` with `data` layered over the registered defaults.
    pub fn render(&self, name: &str, data: &Params) -> Result<String, EngineError> {
        let path = self.path(name)?;
        if !path.is_file() {
            return Err(EngineError::Missing { name: name.to_string(), path });
        }
        let source = read_template(&path)?;

        let mut siblings = self.collect_templates()?;
        siblings.remove(name);

        let mut tera = self.tera.clone();
        register_siblings(&mut tera, siblings.into_iter().collect());
        tera.add_raw_template(name, &source)?;

        let context = to_tera_context(self.data.merged(name, data))?;
        debug!(template = name, path = %path.display(), "rendering template");
        Ok(tera.render(name, &context)?)
    }

    /// The template environment, for registering filters, functions or
    /// inline templates shared by every render.
    pub fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }

    /// Every template reachable by identifier, keyed by that identifier.
    fn collect_templates(&self) -> Result<HashMap<String, String>, EngineError> {
        let ext = self.file_extension();
        let base = match &self.directory {
            Some(dir) => load_templates(dir, ext)?,
            None => Vec::new(),
        };

        let mut templates = HashMap::new();
        for folder in &self.folders {
            if folder.fallback {
                for (name, source) in &base {
                    templates.insert(namespaced(&folder.namespace, name), source.clone());
                }
            }
            for (name, source) in load_templates(&folder.path, ext)? {
                templates.insert(namespaced(&folder.namespace, &name), source);
            }
        }
        templates.extend(base);
        Ok(templates)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
