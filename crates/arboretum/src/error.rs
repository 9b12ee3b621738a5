//! Error types for template evaluation, stores and request handling

use std::path::PathBuf;

use thiserror::Error;

use crate::value::Value;

/// Errors raised while evaluating a template expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A bare identifier that is not bound in the environment
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        /// The identifier that was looked up
        name: String,
    },

    /// Field access on an object that has no such key
    #[error("no field `{field}` on {type_name}")]
    UndefinedField {
        /// Requested field
        field: String,
        /// Type of the value being accessed
        type_name: String,
    },

    /// Index past the end of an array
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Operand types that an operation cannot combine
    #[error("type error: {message}")]
    TypeError {
        /// What went wrong
        message: String,
    },

    /// An expression form outside the template whitelist
    #[error("unsupported expression: {kind}")]
    UnsupportedExpr {
        /// Human-readable expression kind
        kind: String,
    },

    /// A literal form the evaluator does not model
    #[error("unsupported literal: {kind}")]
    UnsupportedLiteral {
        /// Human-readable literal kind
        kind: String,
    },
}

/// Errors raised while loading or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template with this name was loaded
    #[error("template `{0}` not found")]
    NotFound(String),

    /// A template file could not be read
    #[error("failed to read template {path}: {source}")]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A marker that never closes, or an expression that does not parse
    #[error("syntax error in template `{template}`: {message}")]
    Syntax {
        /// Template name
        template: String,
        /// Description of the problem
        message: String,
    },

    /// An expression was rejected at load or failed while rendering
    #[error("error evaluating `{expr}` in template `{template}`: {source}")]
    Eval {
        /// Template name
        template: String,
        /// Source text of the failing expression
        expr: String,
        /// Evaluation failure
        #[source]
        source: EvalError,
    },

    /// The render context could not be serialized
    #[error("failed to serialize render context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Errors surfaced by the catalog, image and config stores and the router.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Missing catalog entry, image or template
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// What kind of resource was missing
        kind: &'static str,
        /// Its name
        name: String,
    },

    /// A filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or written
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Offending file
        path: PathBuf,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Template lookup or rendering failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The upload body was not a usable multipart form
    #[error("malformed upload: {0}")]
    Upload(String),
}

impl CatalogError {
    /// Build a not-found error for a resource kind.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested resource does not exist.
    ///
    /// A raw I/O error never counts, even `ErrorKind::NotFound`: stores turn
    /// a missing resource into `NotFound` themselves, so an I/O error that
    /// reaches the caller is a failed operation.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::NotFound { .. } | CatalogError::Template(TemplateError::NotFound(_))
        )
    }
}

/// Result type alias for store and router operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Name of a value's type, as used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::I64(_) => "integer",
        Value::F64(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
