//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Error, Debug)]
pub enum PromptError {
    /// Requested language variant does not exist
    #[error("Template '{name}' has no '{language}' variant")]
    TemplateNotFound { name: String, language: String },

    #[error("Failed to parse template '{name}' for language '{language}': {detail}")]
    TemplateParseFailed {
        name: String,
        language: String,
        detail: String,
    },

    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    #[error("No templates provided for '{0}'")]
    NoTemplatesProvided(String),

    #[error("No language available for template '{0}'")]
    NoLanguageAvailable(String),

    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),
}
