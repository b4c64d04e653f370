//! The resolved source type tree.
//!
//! This is the converter's view of an Avro schema after the resolver has
//! inlined every named-type reference: a finite, rooted tree of tagged
//! nodes. Fragment conversion consumes this model and nothing else, so a
//! caller with its own schema front-end can build `AvroType` values
//! directly and skip the bundled resolver.

use serde_json::Value;

/// A resolved Avro type node.
///
/// Wrapped and unwrapped unions are distinct tags because they encode
/// values differently on the wire, but they are schema-equivalent: both
/// convert to the same `oneOf` fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    /// Fixed-size byte blob; `size` is the exact byte length.
    Fixed { size: usize },
    /// Enum of named symbols, order preserved as declared.
    Enum { symbols: Vec<String> },
    Array { items: Box<AvroType> },
    Map { values: Box<AvroType> },
    Record { name: String, fields: Vec<Field> },
    UnwrappedUnion(Vec<AvroType>),
    WrappedUnion(Vec<AvroType>),
    Logical(LogicalType),
}

/// One record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: AvroType,
    /// Declared default value. `Some(Value::Null)` is a real `null`
    /// default; `None` means the field declared no default at all.
    pub default: Option<Value>,
}

/// A logical (refinement) type layered on an underlying base type.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalType {
    /// Qualified name of the form `<namespace>:<logical-name>`,
    /// e.g. `"logical:decimal"`.
    pub type_name: String,
    pub inner: Box<AvroType>,
}

impl LogicalType {
    /// The logical-name part of [`type_name`](Self::type_name): the text
    /// after the first `:`, or the whole string when unqualified.
    pub fn logical_name(&self) -> &str {
        match self.type_name.split_once(':') {
            Some((_, name)) => name,
            None => &self.type_name,
        }
    }
}

impl AvroType {
    /// Human-readable tag name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AvroType::Null => "null",
            AvroType::Boolean => "boolean",
            AvroType::Int => "int",
            AvroType::Long => "long",
            AvroType::Float => "float",
            AvroType::Double => "double",
            AvroType::String => "string",
            AvroType::Bytes => "bytes",
            AvroType::Fixed { .. } => "fixed",
            AvroType::Enum { .. } => "enum",
            AvroType::Array { .. } => "array",
            AvroType::Map { .. } => "map",
            AvroType::Record { .. } => "record",
            AvroType::UnwrappedUnion(_) | AvroType::WrappedUnion(_) => "union",
            AvroType::Logical(_) => "logical",
        }
    }
}
