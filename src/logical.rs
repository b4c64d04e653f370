//! Logical-type registry.
//!
//! Maps a logical-name (the part of a logical type's qualified name after
//! the namespace) to the function that renders its JSON Schema fragment.
//! The registry is assembled once at converter construction — built-ins
//! merged with caller-supplied overrides, overrides winning — and is never
//! mutated afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::model::LogicalType;

/// A logical-type fragment renderer.
///
/// Pure function of the logical node; entries are `Arc`ed so the assembled
/// registry (and the converter holding it) stays cheaply cloneable and
/// shareable across threads.
pub type LogicalTypeConverter = Arc<dyn Fn(&LogicalType) -> Value + Send + Sync>;

/// Merge the built-in converters with caller overrides.
///
/// An override with the same logical-name replaces the built-in entry.
pub(crate) fn build_registry(
    overrides: HashMap<String, LogicalTypeConverter>,
) -> HashMap<String, LogicalTypeConverter> {
    let mut registry: HashMap<String, LogicalTypeConverter> = HashMap::new();
    registry.insert("decimal".to_string(), Arc::new(convert_decimal));
    registry.insert("date".to_string(), Arc::new(convert_date));
    registry.insert(
        "timestamp-millis".to_string(),
        Arc::new(convert_timestamp_millis),
    );
    registry.extend(overrides);
    registry
}

// ---------------------------------------------------------------------------
// Built-in converters
// ---------------------------------------------------------------------------
//
// Intentionally coarse: none of these inspect the node's parameters yet
// (decimal precision/scale is ignored, for instance). They look only at the
// logical-name the registry already matched on.

fn convert_decimal(_node: &LogicalType) -> Value {
    json!({ "type": "number" })
}

fn convert_date(_node: &LogicalType) -> Value {
    json!({ "type": "integer", "minimum": 1, "maximum": i64::MAX })
}

fn convert_timestamp_millis(_node: &LogicalType) -> Value {
    json!({ "type": "integer", "minimum": 1, "maximum": i64::MAX })
}
