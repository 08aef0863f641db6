//! Error types for typedmap
//!
//! Error codes:
//! - TYPEDMAP_UNKNOWN_TYPE (Lookup)
//! - TYPEDMAP_INVALID_INPUT (Argument)
//! - TYPEDMAP_CAST_FAILED (Type)
//! - TYPEDMAP_UNKNOWN_ATTRIBUTE (Lookup)
//! - TYPEDMAP_UNKNOWN_PREDICATE (Lookup)
//! - TYPEDMAP_NOT_NESTED (Argument)
//! - TYPEDMAP_DUPLICATE_ATTRIBUTE (Argument)
//! - TYPEDMAP_DUPLICATE_ACCESSOR (Argument)
//! - TYPEDMAP_INVALID_ENUM_MAPPING (Argument)
//! - TYPEDMAP_EMPTY_FIELD_PATH (Argument)
//! - TYPEDMAP_PATH_CONFLICT (Type)
//! - TYPEDMAP_INVALID_CONFIG (Config)

use std::fmt;

use thiserror::Error;

/// Result type for typedmap operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Broad class of a failure, for callers that route errors by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A name (type identifier, attribute, predicate) could not be resolved
    Lookup,
    /// The caller passed an argument of the wrong shape
    Argument,
    /// A value could not be converted or stored
    Type,
    /// Configuration is invalid
    Config,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Lookup => write!(f, "LOOKUP"),
            ErrorClass::Argument => write!(f, "ARGUMENT"),
            ErrorClass::Type => write!(f, "TYPE"),
            ErrorClass::Config => write!(f, "CONFIG"),
        }
    }
}

/// Errors raised while building schemas or operating on typed views
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    // ==================
    // Schema build errors
    // ==================
    /// Type identifier not present in the codec catalog
    #[error("Unknown type '{id}' for attribute '{attribute}'")]
    UnknownType { attribute: String, id: String },

    /// Attribute declared twice under the forbid policy
    #[error("Attribute '{attribute}' already declared on '{schema}'")]
    DuplicateAttribute { schema: String, attribute: String },

    /// Generated accessor name collides with an existing one
    #[error("Accessor '{accessor}' already defined on '{schema}'")]
    DuplicateAccessor { schema: String, accessor: String },

    /// Enum mapping with repeated keys or values
    #[error("Invalid enum mapping: {0}")]
    InvalidEnumMapping(String),

    /// Attribute remapped to an empty key sequence
    #[error("Attribute '{attribute}' on '{schema}' has an empty field path")]
    EmptyFieldPath { schema: String, attribute: String },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ==================
    // Runtime errors
    // ==================
    /// Construction input was neither a map nor a view of the same type
    #[error("Cannot wrap {actual} as '{schema}': expected a map or a '{schema}' view")]
    InvalidInput { schema: String, actual: String },

    /// Codec could not convert the value
    #[error("Cannot cast {value} with codec '{codec}'")]
    Cast { codec: &'static str, value: String },

    /// No attribute with this name on the schema
    #[error("Unknown attribute '{attribute}' on '{schema}'")]
    UnknownAttribute { schema: String, attribute: String },

    /// No predicate with this name on the schema
    #[error("Unknown predicate '{predicate}?' on '{schema}'")]
    UnknownPredicate { schema: String, predicate: String },

    /// Nested bulk assignment on an attribute that is not a nested view
    #[error("Attribute '{attribute}' on '{schema}' is not a nested view")]
    NotNested { schema: String, attribute: String },

    /// Write through a present intermediate segment that is not a map
    #[error("Cannot write '{path}': segment '{segment}' holds {actual}")]
    PathConflict {
        path: String,
        segment: String,
        actual: String,
    },
}

impl ViewError {
    /// Creates a cast error, rendering the offending value for the message
    pub fn cast(codec: &'static str, value: impl fmt::Debug) -> Self {
        ViewError::Cast {
            codec,
            value: format!("{:?}", value),
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::UnknownType { .. } => "TYPEDMAP_UNKNOWN_TYPE",
            ViewError::DuplicateAttribute { .. } => "TYPEDMAP_DUPLICATE_ATTRIBUTE",
            ViewError::DuplicateAccessor { .. } => "TYPEDMAP_DUPLICATE_ACCESSOR",
            ViewError::InvalidEnumMapping(_) => "TYPEDMAP_INVALID_ENUM_MAPPING",
            ViewError::EmptyFieldPath { .. } => "TYPEDMAP_EMPTY_FIELD_PATH",
            ViewError::InvalidConfig(_) => "TYPEDMAP_INVALID_CONFIG",
            ViewError::InvalidInput { .. } => "TYPEDMAP_INVALID_INPUT",
            ViewError::Cast { .. } => "TYPEDMAP_CAST_FAILED",
            ViewError::UnknownAttribute { .. } => "TYPEDMAP_UNKNOWN_ATTRIBUTE",
            ViewError::UnknownPredicate { .. } => "TYPEDMAP_UNKNOWN_PREDICATE",
            ViewError::NotNested { .. } => "TYPEDMAP_NOT_NESTED",
            ViewError::PathConflict { .. } => "TYPEDMAP_PATH_CONFLICT",
        }
    }

    /// Returns the error class
    pub fn class(&self) -> ErrorClass {
        match self {
            ViewError::UnknownType { .. }
            | ViewError::UnknownAttribute { .. }
            | ViewError::UnknownPredicate { .. } => ErrorClass::Lookup,
            ViewError::DuplicateAttribute { .. }
            | ViewError::DuplicateAccessor { .. }
            | ViewError::InvalidEnumMapping(_)
            | ViewError::EmptyFieldPath { .. }
            | ViewError::InvalidInput { .. }
            | ViewError::NotNested { .. } => ErrorClass::Argument,
            ViewError::Cast { .. } | ViewError::PathConflict { .. } => ErrorClass::Type,
            ViewError::InvalidConfig(_) => ErrorClass::Config,
        }
    }
}

/// Returns the JSON type name of a raw value, for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "int",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
