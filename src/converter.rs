//! Avro → JSON Schema conversion.
//!
//! A [`Converter`] walks a resolved [`AvroType`] tree bottom-up (post-order)
//! and assembles the JSON Schema fragment for each node from its children's
//! already-converted fragments. Structural kinds dispatch through a closed
//! `match`; logical types dispatch through the registry assembled at
//! construction time. Conversion is all-or-nothing: any failure during the
//! walk surfaces as an error and no partial fragment is returned.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::error::ConvertError;
use crate::logical::{build_registry, LogicalTypeConverter};
use crate::model::{AvroType, Field, LogicalType};
use crate::resolver;

/// Options for schema conversion.
///
/// `logical_types` maps a logical-name (e.g. `"decimal"`) to the function
/// that renders its fragment. Entries are merged over the built-ins at
/// construction; an entry with a built-in's name replaces it.
#[derive(Clone, Default)]
pub struct ConvertOptions {
    pub logical_types: HashMap<String, LogicalTypeConverter>,
}

/// A configured schema converter.
///
/// Holds only the immutable logical-type registry, so one instance may be
/// cloned and used from any number of threads; each [`convert`](Self::convert)
/// call is independent and stateless.
#[derive(Clone)]
pub struct Converter {
    registry: HashMap<String, LogicalTypeConverter>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            registry: build_registry(options.logical_types),
        }
    }

    /// Convert an Avro schema document to a JSON Schema document.
    ///
    /// Resolves the document with the bundled resolver (recognizing every
    /// logical-name in this converter's registry), then converts the
    /// resolved tree.
    pub fn convert(&self, schema: &Value) -> Result<Value, ConvertError> {
        let logical_names = self.registry.keys().cloned().collect();
        let resolved = resolver::resolve(schema, &logical_names)?;
        self.convert_type(&resolved)
    }

    /// Convert an already-resolved type tree to a JSON Schema document.
    pub fn convert_type(&self, ty: &AvroType) -> Result<Value, ConvertError> {
        tracing::debug!(kind = ty.kind(), "converting resolved schema");
        self.walk(ty, "#")
    }

    // -----------------------------------------------------------------------
    // Kind dispatch
    // -----------------------------------------------------------------------

    /// Convert one node. Exactly one arm per structural tag; `Map` is the
    /// one tag the conversion table does not cover.
    fn walk(&self, node: &AvroType, path: &str) -> Result<Value, ConvertError> {
        match node {
            AvroType::Null => Ok(json!({ "type": "null" })),
            AvroType::Boolean => Ok(json!({ "type": "boolean" })),
            AvroType::Int => Ok(json!({
                "type": "integer",
                "minimum": i32::MIN,
                "maximum": i32::MAX,
            })),
            AvroType::Long => Ok(json!({
                "type": "integer",
                "minimum": i64::MIN,
                "maximum": i64::MAX,
            })),
            AvroType::Float | AvroType::Double => Ok(json!({ "type": "number" })),
            AvroType::String => Ok(json!({ "type": "string" })),
            AvroType::Bytes => Ok(buffer_fragment(None)),
            AvroType::Fixed { size } => Ok(buffer_fragment(Some(*size))),
            AvroType::Enum { symbols } => Ok(json!({ "type": "string", "enum": symbols })),
            AvroType::Array { items } => {
                let items = self.walk(items, &format!("{path}/items"))?;
                Ok(json!({ "type": "array", "items": items }))
            }
            AvroType::Record { fields, .. } => self.convert_record(fields, path),
            AvroType::UnwrappedUnion(members) | AvroType::WrappedUnion(members) => {
                self.convert_union(members, path)
            }
            AvroType::Logical(logical) => self.convert_logical(logical, path),
            AvroType::Map { .. } => Err(ConvertError::UnsupportedType {
                kind: node.kind().to_string(),
                path: path.to_string(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Composite kinds
    // -----------------------------------------------------------------------

    /// Record → `object` fragment.
    ///
    /// A field with a declared default carries it under the fragment's
    /// `default` key and stays out of `required`; a field without one goes
    /// into `required`. "Has a default" means the field declared one at all
    /// — `0`, `false`, `""` and `null` all count. `properties` preserves
    /// field declaration order.
    ///
    /// Error paths index into the source document's `fields` array
    /// (`#/fields/0/…`), the same grammar the resolver reports.
    fn convert_record(&self, fields: &[Field], path: &str) -> Result<Value, ConvertError> {
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for (i, field) in fields.iter().enumerate() {
            let field_path = format!("{path}/fields/{i}");
            let mut fragment = self.walk(&field.ty, &field_path)?;
            match &field.default {
                Some(default) => {
                    let obj = fragment
                        .as_object_mut()
                        .expect("every converted fragment is a JSON object");
                    obj.insert("default".to_string(), default.clone());
                }
                None => required.push(field.name.clone()),
            }
            properties.insert(field.name.clone(), fragment);
        }

        Ok(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
    }

    /// Union → `oneOf` fragment, members in declared order.
    ///
    /// Wrapped and unwrapped unions converge here: the wire-level encoding
    /// difference is irrelevant to a schema description.
    fn convert_union(&self, members: &[AvroType], path: &str) -> Result<Value, ConvertError> {
        let converted = members
            .iter()
            .enumerate()
            .map(|(i, member)| self.walk(member, &format!("{path}/{i}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({ "oneOf": converted }))
    }

    /// Logical type → registry lookup by logical-name.
    fn convert_logical(&self, node: &LogicalType, path: &str) -> Result<Value, ConvertError> {
        let name = node.logical_name();
        match self.registry.get(name) {
            Some(converter) => {
                tracing::debug!(logical = name, "dispatching logical type");
                Ok(converter(node))
            }
            None => Err(ConvertError::UnknownLogicalType {
                name: name.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer fragments
// ---------------------------------------------------------------------------

/// Byte-blob stand-in: a string restricted to single-byte code points, with
/// exact length bounds when the blob's size is known (`fixed`) and no bounds
/// when it is not (`bytes`).
fn buffer_fragment(size: Option<usize>) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!("string"));
    obj.insert("pattern".to_string(), json!("^[\u{0000}-\u{00ff}]*$"));
    if let Some(size) = size {
        obj.insert("minLength".to_string(), json!(size));
        obj.insert("maxLength".to_string(), json!(size));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(ty: &AvroType) -> Value {
        Converter::default().convert_type(ty).unwrap()
    }

    #[test]
    fn primitives() {
        assert_eq!(convert(&AvroType::Null), json!({ "type": "null" }));
        assert_eq!(convert(&AvroType::Boolean), json!({ "type": "boolean" }));
        assert_eq!(convert(&AvroType::String), json!({ "type": "string" }));
        assert_eq!(convert(&AvroType::Float), json!({ "type": "number" }));
        assert_eq!(convert(&AvroType::Double), json!({ "type": "number" }));
    }

    #[test]
    fn int_bounds_are_exact_32_bit() {
        assert_eq!(
            convert(&AvroType::Int),
            json!({
                "type": "integer",
                "minimum": -2147483648i64,
                "maximum": 2147483647i64,
            })
        );
    }

    #[test]
    fn long_bounds_are_exact_64_bit() {
        let fragment = convert(&AvroType::Long);
        assert_eq!(fragment["minimum"], json!(-9223372036854775808i64));
        assert_eq!(fragment["maximum"], json!(9223372036854775807i64));
    }

    #[test]
    fn bytes_has_pattern_but_no_bounds() {
        let fragment = convert(&AvroType::Bytes);
        assert_eq!(
            fragment,
            json!({ "type": "string", "pattern": "^[\u{0000}-\u{00ff}]*$" })
        );
    }

    #[test]
    fn fixed_bounds_equal_declared_size() {
        let fragment = convert(&AvroType::Fixed { size: 16 });
        assert_eq!(fragment["minLength"], json!(16));
        assert_eq!(fragment["maxLength"], json!(16));
        assert_eq!(fragment["pattern"], json!("^[\u{0000}-\u{00ff}]*$"));
    }

    #[test]
    fn enum_preserves_symbol_order() {
        let fragment = convert(&AvroType::Enum {
            symbols: vec!["B".to_string(), "A".to_string(), "C".to_string()],
        });
        assert_eq!(fragment, json!({ "type": "string", "enum": ["B", "A", "C"] }));
    }

    #[test]
    fn array_recurses_into_items() {
        let fragment = convert(&AvroType::Array {
            items: Box::new(AvroType::String),
        });
        assert_eq!(
            fragment,
            json!({ "type": "array", "items": { "type": "string" } })
        );
    }

    #[test]
    fn union_encodings_converge() {
        let members = vec![AvroType::Null, AvroType::String];
        let unwrapped = convert(&AvroType::UnwrappedUnion(members.clone()));
        let wrapped = convert(&AvroType::WrappedUnion(members));
        let expected = json!({ "oneOf": [{ "type": "null" }, { "type": "string" }] });
        assert_eq!(unwrapped, expected);
        assert_eq!(wrapped, expected);
    }

    #[test]
    fn record_splits_required_by_default_presence() {
        let record = AvroType::Record {
            name: "Rec".to_string(),
            fields: vec![
                Field {
                    name: "x".to_string(),
                    ty: AvroType::Int,
                    default: None,
                },
                Field {
                    name: "y".to_string(),
                    ty: AvroType::Int,
                    default: Some(json!(0)),
                },
            ],
        };
        let fragment = convert(&record);
        assert_eq!(fragment["required"], json!(["x"]));
        assert_eq!(fragment["properties"]["y"]["default"], json!(0));
        assert!(fragment["properties"]["x"].get("default").is_none());
    }

    #[test]
    fn falsy_defaults_still_count_as_defaults() {
        for default in [json!(0), json!(false), json!(""), json!(null)] {
            let record = AvroType::Record {
                name: "Rec".to_string(),
                fields: vec![Field {
                    name: "f".to_string(),
                    ty: AvroType::String,
                    default: Some(default.clone()),
                }],
            };
            let fragment = convert(&record);
            assert_eq!(fragment["required"], json!([]));
            assert_eq!(fragment["properties"]["f"]["default"], default);
        }
    }

    #[test]
    fn map_is_rejected_with_its_field_index_path() {
        let record = AvroType::Record {
            name: "Rec".to_string(),
            fields: vec![
                Field {
                    name: "ok".to_string(),
                    ty: AvroType::Int,
                    default: None,
                },
                Field {
                    name: "m".to_string(),
                    ty: AvroType::Map {
                        values: Box::new(AvroType::Int),
                    },
                    default: None,
                },
            ],
        };
        let err = Converter::default().convert_type(&record).unwrap_err();
        match err {
            ConvertError::UnsupportedType { kind, path } => {
                assert_eq!(kind, "map");
                assert_eq!(path, "#/fields/1");
            }
            other => panic!("expected UnsupportedType, got {other}"),
        }
    }

    #[test]
    fn defaults_attach_to_non_object_type_fragments_too() {
        // `oneOf` and `array` fragments are still JSON objects; a default
        // lands on them the same way it lands on a primitive fragment.
        let record = AvroType::Record {
            name: "Rec".to_string(),
            fields: vec![
                Field {
                    name: "u".to_string(),
                    ty: AvroType::UnwrappedUnion(vec![AvroType::Null, AvroType::Int]),
                    default: Some(json!(null)),
                },
                Field {
                    name: "a".to_string(),
                    ty: AvroType::Array {
                        items: Box::new(AvroType::String),
                    },
                    default: Some(json!([])),
                },
            ],
        };
        let fragment = Converter::default().convert_type(&record).unwrap();
        assert_eq!(fragment["properties"]["u"]["default"], json!(null));
        assert_eq!(fragment["properties"]["a"]["default"], json!([]));
        assert_eq!(fragment["required"], json!([]));
    }

    #[test]
    fn unknown_logical_name_fails() {
        let node = AvroType::Logical(LogicalType {
            type_name: "logical:duration".to_string(),
            inner: Box::new(AvroType::Fixed { size: 12 }),
        });
        let err = Converter::default().convert_type(&node).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnknownLogicalType { ref name, .. } if name == "duration"
        ));
    }

    #[test]
    fn logical_override_takes_precedence_over_built_in() {
        let mut logical_types: HashMap<String, LogicalTypeConverter> = HashMap::new();
        logical_types.insert(
            "decimal".to_string(),
            std::sync::Arc::new(|_| json!({ "type": "string", "pattern": "^\\d+$" })),
        );
        let converter = Converter::new(ConvertOptions { logical_types });
        let node = AvroType::Logical(LogicalType {
            type_name: "logical:decimal".to_string(),
            inner: Box::new(AvroType::Bytes),
        });
        assert_eq!(
            converter.convert_type(&node).unwrap(),
            json!({ "type": "string", "pattern": "^\\d+$" })
        );
    }
}
