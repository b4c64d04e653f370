//! # avro-jsonschema
//!
//! Convert [Apache Avro](https://avro.apache.org/) schemas into equivalent
//! [JSON Schema](https://json-schema.org/) documents.
//!
//! The conversion is a pure recursive walk over the resolved Avro type
//! tree: records become `object` fragments with `properties`/`required`,
//! enums become string `enum`s, arrays recurse into `items`, unions of
//! either wire encoding become `oneOf`, fixed/bytes become length-bounded
//! single-byte-pattern strings, and integer widths carry their exact signed
//! bounds. Logical types (`decimal`, `date`, `timestamp-millis` out of the
//! box) dispatch through a registry that callers can extend or override at
//! construction time.
//!
//! This converts schema *descriptions* only — it does not validate data
//! against either schema language, and it does not convert in the reverse
//! direction.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "record",
//!     "name": "Person",
//!     "fields": [
//!         { "name": "name", "type": "string" },
//!         { "name": "age", "type": "int", "default": 0 },
//!     ],
//! });
//!
//! let converted = avro_jsonschema::convert(&schema)?;
//! assert_eq!(converted["type"], json!("object"));
//! assert_eq!(converted["required"], json!(["name"]));
//! assert_eq!(converted["properties"]["age"]["default"], json!(0));
//! # Ok::<(), avro_jsonschema::ConvertError>(())
//! ```
//!
//! ## Custom logical types
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use avro_jsonschema::{ConvertOptions, Converter, LogicalTypeConverter};
//! use serde_json::json;
//!
//! let mut logical_types: HashMap<String, LogicalTypeConverter> = HashMap::new();
//! logical_types.insert(
//!     "uuid".to_string(),
//!     Arc::new(|_| json!({ "type": "string", "format": "uuid" })),
//! );
//! let converter = Converter::new(ConvertOptions { logical_types });
//!
//! let schema = json!({ "type": "string", "logicalType": "uuid" });
//! assert_eq!(
//!     converter.convert(&schema)?,
//!     json!({ "type": "string", "format": "uuid" })
//! );
//! # Ok::<(), avro_jsonschema::ConvertError>(())
//! ```

pub mod converter;
pub mod error;
pub mod logical;
pub mod model;
pub mod resolver;

pub use converter::{ConvertOptions, Converter};
pub use error::ConvertError;
pub use logical::LogicalTypeConverter;
pub use model::{AvroType, Field, LogicalType};

use serde_json::Value;

/// Convert an Avro schema document with the built-in logical types only.
///
/// Shorthand for `Converter::default().convert(schema)`.
pub fn convert(schema: &Value) -> Result<Value, ConvertError> {
    Converter::default().convert(schema)
}

/// Convert an Avro schema from its JSON text form.
///
/// A document that is not valid JSON is rejected the same way any other
/// malformed schema document is, as a [`ConvertError::SchemaResolution`]
/// at the root.
pub fn convert_str(schema: &str) -> Result<Value, ConvertError> {
    let document: Value =
        serde_json::from_str(schema).map_err(|e| ConvertError::SchemaResolution {
            path: "#".to_string(),
            message: e.to_string(),
        })?;
    Converter::default().convert(&document)
}
