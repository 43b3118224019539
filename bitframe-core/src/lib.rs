//! bitframe core library — shared value types, renderer configuration, errors.
//!
//! - [`types`] — [`TemplatePath`], [`Scope`], [`Params`]
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load / save the renderer YAML configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::{DefaultsConfig, FolderConfig, RendererConfig, DEFAULT_EXTENSION};
pub use error::ConfigError;
pub use types::{Params, Scope, TemplatePath};
