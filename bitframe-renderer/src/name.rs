//! Template identifiers: `file` or `namespace::file`.

use crate::error::EngineError;

/// Separates a folder namespace from the file part of an identifier.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// A parsed template identifier. Borrowed from the caller's string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateName<'a> {
    namespace: Option<&'a str>,
    file: &'a str,
}

impl<'a> TemplateName<'a> {
    /// Split `name` into namespace and file.
    ///
    /// `"layout"` has no namespace; `"mail::welcome"` has namespace `mail`.
    /// More than one separator is rejected, as is an empty file part.
    pub fn parse(name: &'a str) -> Result<Self, EngineError> {
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        let parts: Vec<&str> = name.split(NAMESPACE_SEPARATOR).collect();
        let (namespace, file) = match parts.as_slice() {
            [file] => (None, *file),
            [namespace, file] => (Some(*namespace), *file),
            _ => return Err(EngineError::MultipleSeparators(name.to_string())),
        };
        if file.is_empty() {
            return Err(EngineError::EmptyName);
        }
        Ok(TemplateName { namespace, file })
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.namespace
    }

    /// File name on disk: `file.ext`, or `file` when there is no extension.
    pub fn file_name(&self, extension: Option<&str>) -> String {
        match extension {
            Some(ext) => format!("{}.{}", self.file, ext),
            None => self.file.to_string(),
        }
    }
}
