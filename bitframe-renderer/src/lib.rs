//! # bitframe-renderer
//!
//! Template renderer adapter over a tera-backed, file-based engine with a
//! base directory and namespaced search folders.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitframe_core::{Params, Scope};
//! use bitframe_renderer::Renderer;
//! use serde_json::json;
//!
//! fn render_home() -> Result<String, bitframe_renderer::RenderError> {
//!     let mut renderer = Renderer::new(Some("templates".into()));
//!     renderer.add_path("templates/mail", Some("mail"))?;
//!
//!     let mut site = Params::new();
//!     site.insert("site".into(), json!("BitFrame"));
//!     renderer.add_default_param(Scope::AllTemplates, site)?;
//!
//!     renderer.render_serialize("home", &json!({ "name": "World" }))
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod name;
pub mod renderer;

pub use context::TemplateData;
pub use engine::{Engine, Folder};
pub use error::{EngineError, RenderError};
pub use name::{TemplateName, NAMESPACE_SEPARATOR};
pub use renderer::{PathOutcome, Renderer, TemplateRenderer, DUPLICATE_PATH_WARNING};
