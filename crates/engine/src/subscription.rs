//! Path-keyed dependency tracking for reactive invalidation.
//!
//! Each bound template registers the absolute paths it reads against the
//! surface it renders into. When a write lands, every component whose
//! registered path is equal to, an ancestor of, or a descendant of the
//! changed path is marked dirty; the renderer drains the dirty set and
//! re-evaluates only those components instead of the whole tree.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde_json::Value;
use surface_protocol::ComponentNode;

use crate::error::{EngineError, Result};
use crate::interpolation::interpolation_dependencies;
use crate::path::resolve_path;

#[derive(Default)]
struct SurfaceSubscriptions {
    /// Component id → absolute paths its bindings and templates read.
    dependencies: HashMap<String, Vec<String>>,
    /// Components awaiting re-evaluation.
    dirty: HashSet<String>,
}

/// Surface-scoped invalidation index.
pub struct DependencyIndex {
    surfaces: RwLock<HashMap<String, SurfaceSubscriptions>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self {
            surfaces: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the registered path set for a component.
    ///
    /// Registering an empty set effectively unsubscribes the component.
    pub fn register(
        &self,
        surface_id: &str,
        component_id: &str,
        paths: Vec<String>,
    ) -> Result<()> {
        let mut surfaces = self
            .surfaces
            .write()
            .map_err(|_| EngineError::StorePoisoned { store: "dependency" })?;
        let subs = surfaces.entry(surface_id.to_string()).or_default();
        if paths.is_empty() {
            subs.dependencies.remove(component_id);
        } else {
            subs.dependencies.insert(component_id.to_string(), paths);
        }
        Ok(())
    }

    /// Marks every dependent of `changed_path` dirty and returns how many
    /// components were affected.
    pub fn invalidate(&self, surface_id: &str, changed_path: &str) -> Result<usize> {
        let mut surfaces = self
            .surfaces
            .write()
            .map_err(|_| EngineError::StorePoisoned { store: "dependency" })?;
        let Some(subs) = surfaces.get_mut(surface_id) else {
            return Ok(0);
        };
        let mut affected = 0;
        for (component_id, paths) in &subs.dependencies {
            if paths.iter().any(|path| paths_overlap(path, changed_path))
                && subs.dirty.insert(component_id.clone())
            {
                affected += 1;
            }
        }
        if affected > 0 {
            tracing::trace!(
                surface = surface_id,
                path = changed_path,
                affected,
                "dependents invalidated"
            );
        }
        Ok(affected)
    }

    /// Drains and returns the dirty component ids for a surface.
    pub fn take_dirty(&self, surface_id: &str) -> Result<Vec<String>> {
        let mut surfaces = self
            .surfaces
            .write()
            .map_err(|_| EngineError::StorePoisoned { store: "dependency" })?;
        Ok(surfaces
            .get_mut(surface_id)
            .map(|subs| subs.dirty.drain().collect())
            .unwrap_or_default())
    }
}

impl Default for DependencyIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// True when one path equals, contains, or is contained by the other.
///
/// `/user` overlaps `/user/name` in both directions: writing the parent
/// rewrites the child, and writing the child changes what the parent renders.
fn paths_overlap(a: &str, b: &str) -> bool {
    let mut a_segments = a.split('/').filter(|s| !s.is_empty());
    let mut b_segments = b.split('/').filter(|s| !s.is_empty());
    loop {
        match (a_segments.next(), b_segments.next()) {
            (Some(x), Some(y)) if x == y => continue,
            (Some(_), Some(_)) => return false,
            // one side exhausted: equal, ancestor, or descendant
            _ => return true,
        }
    }
}

/// Collects every absolute data model path a component definition reads:
/// bound `{path}` sources and `${...}` templates, wherever they nest.
///
/// Definitions carry no base path of their own, so relative expressions
/// resolve root-relative here (`${name}` registers as `/name`). A renderer
/// that evaluates a template against a non-root base must re-register the
/// component via [`DependencyIndex::register`] with the paths it actually
/// read.
pub fn component_dependencies(component: &ComponentNode) -> Vec<String> {
    let mut paths = Vec::new();
    for value in component.properties.values() {
        collect_paths(value, &mut paths);
    }
    paths.sort();
    paths.dedup();
    paths
}

fn collect_paths(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(template) => out.extend(interpolation_dependencies(template, None)),
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("path") {
                out.push(resolve_path(path, None));
            }
            for nested in map.values() {
                collect_paths(nested, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_paths(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlap_covers_equal_ancestor_descendant() {
        assert!(paths_overlap("/user/name", "/user/name"));
        assert!(paths_overlap("/user", "/user/name"));
        assert!(paths_overlap("/user/name/first", "/user/name"));
        assert!(!paths_overlap("/stats", "/user/name"));
        assert!(!paths_overlap("/user/age", "/user/name"));
    }

    #[test]
    fn invalidate_marks_overlapping_dependents() {
        let index = DependencyIndex::new();
        index.register("s1", "label", vec!["/user/name".into()]).unwrap();
        index.register("s1", "card", vec!["/user".into()]).unwrap();
        index.register("s1", "first", vec!["/user/name/first".into()]).unwrap();
        index.register("s1", "counter", vec!["/stats".into()]).unwrap();

        assert_eq!(index.invalidate("s1", "/user/name").unwrap(), 3);
        let mut dirty = index.take_dirty("s1").unwrap();
        dirty.sort();
        assert_eq!(dirty, ["card", "first", "label"]);
    }

    #[test]
    fn take_dirty_drains() {
        let index = DependencyIndex::new();
        index.register("s1", "label", vec!["/name".into()]).unwrap();
        index.invalidate("s1", "/name").unwrap();
        assert_eq!(index.take_dirty("s1").unwrap(), ["label"]);
        assert!(index.take_dirty("s1").unwrap().is_empty());
    }

    #[test]
    fn invalidation_is_surface_scoped() {
        let index = DependencyIndex::new();
        index.register("s1", "label", vec!["/name".into()]).unwrap();
        index.register("s2", "label", vec!["/name".into()]).unwrap();
        index.invalidate("s1", "/name").unwrap();
        assert!(index.take_dirty("s2").unwrap().is_empty());
    }

    #[test]
    fn reregistering_replaces_the_key_set() {
        let index = DependencyIndex::new();
        index.register("s1", "label", vec!["/old".into()]).unwrap();
        index.register("s1", "label", vec!["/new".into()]).unwrap();
        assert_eq!(index.invalidate("s1", "/old").unwrap(), 0);
        assert_eq!(index.invalidate("s1", "/new").unwrap(), 1);
    }

    #[test]
    fn relative_expressions_register_root_relative() {
        let component: ComponentNode = serde_json::from_value(json!({"Text": {
            "text": {"literalString": "Hi, ${name}"},
            "value": {"path": "item"}
        }}))
        .unwrap();
        assert_eq!(component_dependencies(&component), ["/item", "/name"]);
    }

    #[test]
    fn component_dependencies_cover_bindings_and_templates() {
        let component: ComponentNode = serde_json::from_value(json!({"Text": {
            "text": {"literalString": "Hello, ${/user/name}!"},
            "tooltip": {"path": "/user/title"},
            "action": {"name": "tap", "context": [
                {"key": "age", "value": {"path": "/user/age"}}
            ]}
        }}))
        .unwrap();
        assert_eq!(
            component_dependencies(&component),
            ["/user/age", "/user/name", "/user/title"]
        );
    }
}
