//! Error types for schema conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Schema resolution error at {path}: {message}")]
    SchemaResolution { path: String, message: String },

    #[error("Unknown logical type `{name}` at {path}")]
    UnknownLogicalType { name: String, path: String },

    #[error("Unsupported type `{kind}` at {path}")]
    UnsupportedType { kind: String, path: String },
}
