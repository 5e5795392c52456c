//! Error types shared by the registry, pipeline and decorators

use thiserror::Error;

/// Errors raised while resolving, laying out or drawing a field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectorError {
    /// An annotation references a field that does not exist
    #[error("field `{field}`: {annotation} references missing path `{path}`")]
    UnresolvedPath {
        field: String,
        annotation: &'static str,
        path: String,
    },

    /// A value has a different shape than the decorator expects
    #[error("`{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// A decorator factory received an annotation it cannot configure from
    #[error("{decorator} cannot be configured from annotation {annotation}")]
    AnnotationMismatch {
        decorator: &'static str,
        annotation: &'static str,
    },

    /// The data model refused to apply a change
    #[error("commit of `{path}` rejected: {reason}")]
    CommitRejected { path: String, reason: String },

    /// A path string could not be parsed or does not address a node
    #[error("invalid path `{0}`")]
    InvalidPath(String),

    /// A button refers to a method that the data model does not know
    #[error("no method `{method}` on `{owner}`")]
    MethodNotFound { owner: String, method: String },

    /// A type picker selected a type nobody registered
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for InspectorError {
    fn from(err: serde_json::Error) -> Self {
        InspectorError::Config(err.to_string())
    }
}

impl From<std::io::Error> for InspectorError {
    fn from(err: std::io::Error) -> Self {
        InspectorError::Config(err.to_string())
    }
}

pub type Result<T, E = InspectorError> = std::result::Result<T, E>;
