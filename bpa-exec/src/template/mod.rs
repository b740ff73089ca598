//! Template rendering steps.

mod backend;
mod executor;
mod variables;

pub use backend::{DirTemplateBackend, MemoryTemplateBackend, TemplateBackend, TemplateRenderError};
pub use executor::{TemplateDetails, TemplateExecutor};
pub use variables::VariableTemplateBackend;
