//! In-memory data model store: one JSON document per surface id.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use surface_protocol::DataEntry;

use crate::error::{EngineError, Result};
use crate::path::{get_value_by_path, set_value_by_path};

/// Owns every surface's data model tree.
///
/// All partitions sit behind a single `RwLock`, which serializes write-backs
/// from two-way-bound widgets against in-flight interpolation reads: a reader
/// never observes a half-applied write, and everything resolved under one
/// read guard sees one consistent point-in-time snapshot.
pub struct DataModelStore {
    models: RwLock<HashMap<String, Value>>,
}

impl DataModelStore {
    pub fn new() -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Value>>> {
        self.models
            .read()
            .map_err(|_| EngineError::StorePoisoned { store: "data model" })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Value>>> {
        self.models
            .write()
            .map_err(|_| EngineError::StorePoisoned { store: "data model" })
    }

    /// Creates the surface's empty root object if it does not exist yet.
    ///
    /// Called on surface init so bound reads have a tree to miss against.
    pub fn ensure(&self, surface_id: &str) -> Result<()> {
        let mut models = self.write_guard()?;
        models
            .entry(surface_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        Ok(())
    }

    /// Reads the value at `path`, cloning it out of the tree.
    ///
    /// Creates no state as a side effect; an unknown surface id or a missing
    /// path yields `Ok(None)`.
    pub fn get(&self, surface_id: &str, path: &str) -> Result<Option<Value>> {
        let models = self.read_guard()?;
        Ok(models
            .get(surface_id)
            .and_then(|tree| get_value_by_path(tree, path))
            .cloned())
    }

    /// Writes a single value at `path`, creating the surface's root object
    /// and any missing intermediate objects.
    ///
    /// The write is synchronous: it is visible to every subsequent reader the
    /// moment this returns.
    pub fn set(&self, surface_id: &str, path: &str, value: Value) -> Result<()> {
        let mut models = self.write_guard()?;
        let tree = models
            .entry(surface_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        set_value_by_path(tree, path, value);
        tracing::trace!(surface = surface_id, path, "data model write");
        Ok(())
    }

    /// Merges scalar entries into the object at `target_path` (the model root
    /// when `None`), creating that object if absent.
    ///
    /// Entries land key by key, so existing siblings under `target_path` are
    /// preserved — this merges into the target object, never replaces it.
    pub fn apply_update(
        &self,
        surface_id: &str,
        target_path: Option<&str>,
        entries: &[DataEntry],
    ) -> Result<()> {
        let mut models = self.write_guard()?;
        let tree = models
            .entry(surface_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let base = target_path.unwrap_or("").trim_end_matches('/');
        for entry in entries {
            let path = format!("{base}/{key}", key = entry.key);
            set_value_by_path(tree, &path, entry.value.clone().into_json());
        }
        tracing::debug!(
            surface = surface_id,
            target = target_path.unwrap_or("/"),
            entries = entries.len(),
            "data model update applied"
        );
        Ok(())
    }

    /// Runs `f` against the surface's live tree under the read guard.
    ///
    /// This is the consistent-snapshot primitive: every lookup `f` performs
    /// observes the same state, with no writer interleaving. Dispatch-time
    /// context resolution and interpolation reads go through here.
    pub fn with_model<T>(&self, surface_id: &str, f: impl FnOnce(Option<&Value>) -> T) -> Result<T> {
        let models = self.read_guard()?;
        Ok(f(models.get(surface_id)))
    }
}

impl Default for DataModelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use surface_protocol::DataValue;

    fn entry(key: &str, value: DataValue) -> DataEntry {
        DataEntry {
            key: key.into(),
            value,
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = DataModelStore::new();
        store.set("s1", "/user/name", json!("John")).unwrap();
        assert_eq!(store.get("s1", "/user/name").unwrap(), Some(json!("John")));
    }

    #[test]
    fn unknown_surface_reads_absent_without_side_effects() {
        let store = DataModelStore::new();
        assert_eq!(store.get("nope", "/anything").unwrap(), None);
        // the failed read must not have created a partition
        assert_eq!(store.with_model("nope", |m| m.is_some()).unwrap(), false);
    }

    #[test]
    fn surfaces_never_alias_data() {
        let store = DataModelStore::new();
        store.set("s1", "/name", json!("John")).unwrap();
        store.set("s2", "/name", json!("Jane")).unwrap();
        assert_eq!(store.get("s1", "/name").unwrap(), Some(json!("John")));
        assert_eq!(store.get("s2", "/name").unwrap(), Some(json!("Jane")));
    }

    #[test]
    fn apply_update_merges_at_root_by_default() {
        let store = DataModelStore::new();
        store.set("s1", "/existing", json!(true)).unwrap();
        store
            .apply_update(
                "s1",
                None,
                &[
                    entry("name", DataValue::String("John".into())),
                    entry("age", DataValue::Number(30.0)),
                ],
            )
            .unwrap();
        assert_eq!(store.get("s1", "/name").unwrap(), Some(json!("John")));
        assert_eq!(store.get("s1", "/age").unwrap(), Some(json!(30)));
        // merge, not replace: the pre-existing sibling survives
        assert_eq!(store.get("s1", "/existing").unwrap(), Some(json!(true)));
    }

    #[test]
    fn apply_update_targets_a_nested_object() {
        let store = DataModelStore::new();
        store.set("s1", "/form/dirty", json!(false)).unwrap();
        store
            .apply_update(
                "s1",
                Some("/form"),
                &[entry("email", DataValue::String("a@b.c".into()))],
            )
            .unwrap();
        assert_eq!(
            store.get("s1", "/form").unwrap(),
            Some(json!({"dirty": false, "email": "a@b.c"}))
        );
    }

    #[test]
    fn apply_update_creates_missing_target() {
        let store = DataModelStore::new();
        store
            .apply_update(
                "s1",
                Some("/settings/flags"),
                &[entry("dark", DataValue::Boolean(true))],
            )
            .unwrap();
        assert_eq!(
            store.get("s1", "/settings/flags/dark").unwrap(),
            Some(json!(true))
        );
    }

    #[test]
    fn ensure_creates_an_empty_root_once() {
        let store = DataModelStore::new();
        store.ensure("s1").unwrap();
        assert_eq!(store.get("s1", "/").unwrap(), Some(json!({})));
        store.set("s1", "/kept", json!(1)).unwrap();
        store.ensure("s1").unwrap();
        assert_eq!(store.get("s1", "/kept").unwrap(), Some(json!(1)));
    }

    #[test]
    fn with_model_observes_one_snapshot() {
        let store = DataModelStore::new();
        store.set("s1", "/a", json!(1)).unwrap();
        store.set("s1", "/b", json!(2)).unwrap();
        let (a, b) = store
            .with_model("s1", |model| {
                let tree = model.expect("model exists");
                (
                    get_value_by_path(tree, "/a").cloned(),
                    get_value_by_path(tree, "/b").cloned(),
                )
            })
            .unwrap();
        assert_eq!(a, Some(json!(1)));
        assert_eq!(b, Some(json!(2)));
    }
}
