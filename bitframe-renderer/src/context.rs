//! Default template parameters and the tera context built from them.

use std::collections::HashMap;

use serde_json::Value;

use bitframe_core::Params;

use crate::error::EngineError;

/// Default parameters registered on an engine.
///
/// `shared` applies to every template; `templates` holds one set per template
/// identifier. Lookups layer shared, then template-specific values, so the
/// more specific value wins on a key collision. Adding to an existing set
/// merges key-wise, later values replacing earlier ones.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    shared: Params,
    templates: HashMap<String, Params>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `params` into the shared set (`None`) or one template's set.
    pub fn add(&mut self, params: Params, template: Option<&str>) {
        let target = match template {
            None => &mut self.shared,
            Some(name) => self.templates.entry(name.to_string()).or_default(),
        };
        target.extend(params);
    }

    /// Shared defaults layered with the given template's own defaults.
    pub fn get(&self, template: Option<&str>) -> Params {
        let mut merged = self.shared.clone();
        if let Some(own) = template.and_then(|name| self.templates.get(name)) {
            merged.extend(own.clone());
        }
        merged
    }

    /// Defaults for `template` with `data` layered on top.
    pub fn merged(&self, template: &str, data: &Params) -> Params {
        let mut merged = self.get(Some(template));
        merged.extend(data.clone());
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.shared.is_empty() && self.templates.values().all(Params::is_empty)
    }
}

/// Convert a parameter map into a [`tera::Context`] for rendering.
pub fn to_tera_context(params: Params) -> Result<tera::Context, EngineError> {
    tera::Context::from_value(Value::Object(params)).map_err(EngineError::from)
}
