//! Avro schema document resolution.
//!
//! Turns an Avro schema document (a `serde_json::Value`, as parsed from an
//! `.avsc` file) into a fully-resolved [`AvroType`] tree. Named types
//! (`record`, `enum`, `fixed`) are registered as they are resolved and every
//! later reference to them is inlined as the concrete node at the use site,
//! so the converter never sees an unresolved name.
//!
//! The resolver is told up front which logical-type names to recognize; a
//! `logicalType` annotation outside that set is dropped and the base type is
//! used as-is.
//!
//! Recursive named types (a reference back into a type still being resolved)
//! are rejected: the output is a finite tree, not a graph.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::model::{AvroType, Field, LogicalType};

/// Namespace prefix under which recognized logical annotations are filed in
/// [`LogicalType::type_name`].
const LOGICAL_NAMESPACE: &str = "logical";

const PRIMITIVE_NAMES: &[(&str, AvroType)] = &[
    ("null", AvroType::Null),
    ("boolean", AvroType::Boolean),
    ("int", AvroType::Int),
    ("long", AvroType::Long),
    ("float", AvroType::Float),
    ("double", AvroType::Double),
    ("string", AvroType::String),
    ("bytes", AvroType::Bytes),
];

/// Resolve a schema document into a type tree.
///
/// `logical_names` is the set of logical-type names the caller intends to
/// handle (the converter passes its registry's keys).
pub fn resolve(
    document: &Value,
    logical_names: &HashSet<String>,
) -> Result<AvroType, ConvertError> {
    let mut resolver = Resolver {
        logical_names,
        named: HashMap::new(),
        in_progress: Vec::new(),
    };
    resolver.resolve_node(document, "#")
}

// ---------------------------------------------------------------------------
// Raw attribute shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawEnum {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    symbols: Vec<String>,
}

#[derive(Deserialize)]
struct RawFixed {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    size: usize,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

struct Resolver<'a> {
    logical_names: &'a HashSet<String>,
    /// Completed named types, keyed by short name and by `namespace.name`.
    named: HashMap<String, AvroType>,
    /// Named types currently being resolved; a reference into this set is a
    /// recursive schema.
    in_progress: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_node(&mut self, node: &Value, path: &str) -> Result<AvroType, ConvertError> {
        match node {
            Value::String(name) => self.resolve_name(name, path),
            Value::Array(members) => self.resolve_union(members, path),
            Value::Object(obj) => self.resolve_object(obj, path),
            other => Err(schema_error(
                path,
                format!("expected a type name, union array, or type object, got {other}"),
            )),
        }
    }

    /// Resolve a type given by name: a primitive, or a reference to an
    /// already-resolved named type.
    fn resolve_name(&mut self, name: &str, path: &str) -> Result<AvroType, ConvertError> {
        if let Some((_, ty)) = PRIMITIVE_NAMES.iter().find(|(n, _)| *n == name) {
            return Ok(ty.clone());
        }
        if let Some(ty) = self.named.get(name) {
            return Ok(ty.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            return Err(schema_error(
                path,
                format!("recursive type reference `{name}` is not supported"),
            ));
        }
        Err(schema_error(path, format!("unknown type name `{name}`")))
    }

    /// A JSON array is a union. Encoding choice: at most one non-`null`
    /// member is unambiguous on the wire and resolves unwrapped; anything
    /// else resolves wrapped. Both convert identically.
    fn resolve_union(&mut self, members: &[Value], path: &str) -> Result<AvroType, ConvertError> {
        if members.is_empty() {
            return Err(schema_error(path, "union must have at least one member"));
        }
        let resolved = members
            .iter()
            .enumerate()
            .map(|(i, member)| self.resolve_node(member, &format!("{path}/{i}")))
            .collect::<Result<Vec<_>, ConvertError>>()?;

        let non_null = resolved.iter().filter(|m| **m != AvroType::Null).count();
        if non_null <= 1 {
            Ok(AvroType::UnwrappedUnion(resolved))
        } else {
            Ok(AvroType::WrappedUnion(resolved))
        }
    }

    fn resolve_object(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
    ) -> Result<AvroType, ConvertError> {
        let type_attr = obj
            .get("type")
            .ok_or_else(|| schema_error(path, "type object is missing its `type` attribute"))?;

        // {"type": [...]} and {"type": {...}} nest a full schema under the
        // attribute; recurse rather than expecting a name.
        let base = match type_attr {
            Value::String(name) => self.resolve_named_object(name, obj, path)?,
            nested => self.resolve_node(nested, &format!("{path}/type"))?,
        };

        match obj.get("logicalType").and_then(Value::as_str) {
            Some(logical) if self.logical_names.contains(logical) => {
                Ok(AvroType::Logical(LogicalType {
                    type_name: format!("{LOGICAL_NAMESPACE}:{logical}"),
                    inner: Box::new(base),
                }))
            }
            // Unrecognized annotation: keep the base type.
            _ => Ok(base),
        }
    }

    fn resolve_named_object(
        &mut self,
        type_name: &str,
        obj: &Map<String, Value>,
        path: &str,
    ) -> Result<AvroType, ConvertError> {
        match type_name {
            "record" => self.resolve_record(obj, path),
            "enum" => {
                let raw: RawEnum = from_attrs(obj, path)?;
                let ty = AvroType::Enum {
                    symbols: raw.symbols,
                };
                self.register(&raw.name, raw.namespace.as_deref(), ty.clone());
                Ok(ty)
            }
            "fixed" => {
                let raw: RawFixed = from_attrs(obj, path)?;
                if raw.size == 0 {
                    return Err(schema_error(path, "fixed size must be positive"));
                }
                let ty = AvroType::Fixed { size: raw.size };
                self.register(&raw.name, raw.namespace.as_deref(), ty.clone());
                Ok(ty)
            }
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| schema_error(path, "array is missing `items`"))?;
                Ok(AvroType::Array {
                    items: Box::new(self.resolve_node(items, &format!("{path}/items"))?),
                })
            }
            "map" => {
                let values = obj
                    .get("values")
                    .ok_or_else(|| schema_error(path, "map is missing `values`"))?;
                Ok(AvroType::Map {
                    values: Box::new(self.resolve_node(values, &format!("{path}/values"))?),
                })
            }
            // {"type": "int"} and friends, or a named-type reference in
            // object form.
            name => self.resolve_name(name, path),
        }
    }

    fn resolve_record(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
    ) -> Result<AvroType, ConvertError> {
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| schema_error(path, "record is missing its `name`"))?
            .to_string();
        let namespace = obj.get("namespace").and_then(Value::as_str);
        let raw_fields = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| schema_error(path, "record is missing its `fields` array"))?;

        self.in_progress.push(name.clone());
        if let Some(ns) = namespace {
            self.in_progress.push(format!("{ns}.{name}"));
        }

        let mut fields: Vec<Field> = Vec::with_capacity(raw_fields.len());
        for (i, raw) in raw_fields.iter().enumerate() {
            let field = self.resolve_field(raw, &format!("{path}/fields/{i}"))?;
            if fields.iter().any(|f| f.name == field.name) {
                return Err(schema_error(
                    path,
                    format!("duplicate field name `{}`", field.name),
                ));
            }
            fields.push(field);
        }

        if namespace.is_some() {
            self.in_progress.pop();
        }
        self.in_progress.pop();

        let ty = AvroType::Record {
            name: name.clone(),
            fields,
        };
        self.register(&name, namespace, ty.clone());
        Ok(ty)
    }

    fn resolve_field(&mut self, raw: &Value, path: &str) -> Result<Field, ConvertError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| schema_error(path, "field must be an object"))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| schema_error(path, "field is missing its `name`"))?
            .to_string();
        let ty_value = obj
            .get("type")
            .ok_or_else(|| schema_error(path, format!("field `{name}` is missing its type")))?;
        let ty = self.resolve_node(ty_value, &format!("{path}/type"))?;

        // Presence of the key is what counts: `null`, `0`, `false` and `""`
        // are all real defaults, absence of the key is the no-default case.
        let default = obj.get("default").cloned();

        Ok(Field { name, ty, default })
    }

    fn register(&mut self, name: &str, namespace: Option<&str>, ty: AvroType) {
        if let Some(ns) = namespace {
            self.named.insert(format!("{ns}.{name}"), ty.clone());
        }
        self.named.insert(name.to_string(), ty);
    }
}

fn schema_error(path: &str, message: impl Into<String>) -> ConvertError {
    ConvertError::SchemaResolution {
        path: path.to_string(),
        message: message.into(),
    }
}

fn from_attrs<T: for<'de> Deserialize<'de>>(
    obj: &Map<String, Value>,
    path: &str,
) -> Result<T, ConvertError> {
    serde_json::from_value(Value::Object(obj.clone()))
        .map_err(|e| schema_error(path, e.to_string()))
}
