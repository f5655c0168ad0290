//! # dct_templates
//!
//! Placeholder template rendering for dc-testkit.
//!
//! Templates use Go-style `{{.name}}` placeholders (the leading dot and the
//! inner whitespace are optional). Rendering is strict: a placeholder with no
//! value is an error instead of being left in the output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dct_templates::TemplateRenderer;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let renderer = TemplateRenderer::new();
//! let mut vars = HashMap::new();
//! vars.insert("region".to_string(), "us-east-2".to_string());
//!
//! let path = renderer
//!     .render_file(
//!         Path::new("test-config.tfvars.tmpl"),
//!         Path::new("test-config.tfvars"),
//!         &vars,
//!     )
//!     .unwrap();
//! println!("rendered to {}", path.display());
//! ```

pub mod error;
pub mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use renderer::TemplateRenderer;
