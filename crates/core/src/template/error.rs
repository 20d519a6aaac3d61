//! Error types for the template module.

use thiserror::Error;

/// Template compilation errors. All of them are configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template references a field that does not exist.
    #[error("Unknown template field '{field}' in '{template}'")]
    UnknownField { field: String, template: String },

    /// The directive is not valid for the field's type.
    #[error("Invalid format '{spec}' for field '{field}' in '{template}'")]
    InvalidFormat {
        field: String,
        spec: String,
        template: String,
    },

    /// A brace is not closed or not opened.
    #[error("Unbalanced braces in '{template}'")]
    Unbalanced { template: String },

    /// A named template has no content.
    #[error("Template '{name}' is empty")]
    Empty { name: String },
}
