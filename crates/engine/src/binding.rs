//! Value-source resolution: literal vs. data-model-bound property values.
//!
//! Every resolution happens against the tree the caller holds *now*; nothing
//! here caches a resolved value, so bound properties always reflect the
//! current data model state.

use serde_json::Value;
use surface_protocol::ValueSource;

use crate::interpolation::interpolate;
use crate::path::get_value_by_path;

/// Resolves a source against a model tree.
///
/// Literals return their embedded value unchanged; bound paths read the tree.
/// Absent stays `None` — callers decide defaulting.
pub fn resolve_source(model: Option<&Value>, source: &ValueSource) -> Option<Value> {
    match source {
        ValueSource::Path(path) => model.and_then(|tree| get_value_by_path(tree, path)).cloned(),
        literal => literal.literal(),
    }
}

/// Resolves a string-valued property the way display components consume it.
///
/// Bound paths read the model; literal strings are interpolated against the
/// model (so templates embedded in literals stay live); anything unresolved
/// falls back to `default`.
pub fn resolve_string(
    model: Option<&Value>,
    source: &ValueSource,
    base_path: Option<&str>,
    default: &str,
) -> String {
    match source {
        ValueSource::LiteralString(template) => {
            interpolate(template, model.unwrap_or(&Value::Null), base_path)
        }
        source => match resolve_source(model, source) {
            Some(Value::String(s)) => s,
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Null) | None => default.to_string(),
            Some(container) => container.to_string(),
        },
    }
}

/// Resolves a boolean property for form components (checkbox state and the
/// like), falling back to `default` when absent or not a boolean.
pub fn resolve_bool(model: Option<&Value>, source: &ValueSource, default: bool) -> bool {
    resolve_source(model, source)
        .as_ref()
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

/// Resolves a numeric property, falling back to `default` when absent or not
/// a number.
pub fn resolve_number(model: Option<&Value>, source: &ValueSource, default: f64) -> f64 {
    resolve_source(model, source)
        .as_ref()
        .and_then(Value::as_f64)
        .unwrap_or(default)
}
