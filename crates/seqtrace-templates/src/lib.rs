pub mod defaults;
pub mod error;
pub mod loader;

pub use defaults::default_templates;
pub use error::{Error, Result};
pub use loader::{TemplateSet, TemplateSource, ValidationIssue};
