//! Pure path resolution over JSON trees.
//!
//! Data model values are addressed by slash-delimited paths (`/user/name`).
//! These functions never allocate intermediate trees on reads and never fail
//! for missing paths: a miss is `None`, not an error.

use serde_json::{Map, Value};

/// Resolves a possibly-relative path against a base path.
///
/// Absolute paths (leading `/`) are returned unchanged. Relative paths —
/// with or without a `./` prefix — are joined onto `base_path` (the model
/// root when absent) and normalized to a single-`/`-separated absolute form.
pub fn resolve_path(path: &str, base_path: Option<&str>) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let relative = path.strip_prefix("./").unwrap_or(path);
    let base = base_path.unwrap_or("");
    let joined: Vec<&str> = base
        .split('/')
        .chain(relative.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", joined.join("/"))
}

/// Splits a path into its non-empty segments.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Reads the value at `path`.
///
/// Descends nested objects and arrays (numeric segments index arrays) and
/// returns `None` the moment any segment is missing or the current node is
/// not a container. Never panics for a malformed path.
pub fn get_value_by_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating empty objects for missing intermediate
/// segments and assigning the leaf in place.
///
/// In-bounds numeric segments descend into existing arrays; any other
/// non-container intermediate is replaced by an object so the write always
/// lands. An empty path replaces the whole tree.
pub fn set_value_by_path(tree: &mut Value, path: &str, value: Value) {
    let segs: Vec<&str> = segments(path).collect();
    set_at(tree, &segs, value);
}

fn set_at(node: &mut Value, segs: &[&str], value: Value) {
    let Some((segment, rest)) = segs.split_first() else {
        *node = value;
        return;
    };

    let array_index = match &*node {
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .filter(|index| *index < items.len()),
        _ => None,
    };
    if let Some(index) = array_index {
        if let Value::Array(items) = node {
            set_at(&mut items[index], rest, value);
        }
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let slot = map.entry((*segment).to_string()).or_insert(Value::Null);
        set_at(slot, rest, value);
    }
}
