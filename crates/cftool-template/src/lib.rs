//! # cftool-template
//!
//! Template decoding and offline validation.
//!
//! A template (JSON or YAML) is decoded into a [`Template`] and checked
//! against a [`Specification`]: every resource must have a known type and
//! carry the properties its type requires.

mod error;
pub mod specification;
pub mod template;
pub mod validator;

pub use error::{Error, Result};
pub use specification::{PropertySpec, ResourceSpec, Specification};
pub use template::{Resource, Template, TemplateFormat};
pub use validator::{Finding, ValidationReport, validate_template};
