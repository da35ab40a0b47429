//! Component-node wire shape and the typed accessors the engine reads.
//!
//! Rendering a component kind is the renderer collaborator's job; this module
//! only models what the synchronization engine needs from a definition: its
//! kind, its property bag, and the bound/templated values inside it.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::action::Action;
use crate::value::ValueSource;

/// A single component definition as delivered by `surfaceUpdate`.
///
/// Wire form is a single-key map from kind to properties:
///
/// ```json
/// {"Text": {"text": {"path": "/title"}}}
/// {"Column": {"children": ["header", "body"]}}
/// ```
///
/// Property values stay as raw JSON; the engine interprets them on demand via
/// [`ComponentNode::value_source`] and friends so unknown component kinds and
/// unknown properties pass through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentNode {
    pub kind: String,
    pub properties: Map<String, Value>,
}

impl ComponentNode {
    /// A component of the given kind with no properties.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Map::new(),
        }
    }

    /// Adds a raw property (builder style, used by hosts and tests).
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Raw property value, if present.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Property interpreted as a value source, if it has that shape.
    pub fn value_source(&self, key: &str) -> Option<ValueSource> {
        serde_json::from_value(self.properties.get(key)?.clone()).ok()
    }

    /// Property interpreted as an action description, if it has that shape.
    pub fn action(&self, key: &str) -> Option<Action> {
        serde_json::from_value(self.properties.get(key)?.clone()).ok()
    }

    /// Child component ids referenced by this node, in declaration order.
    ///
    /// Missing or malformed `children` properties yield an empty list; a
    /// referenced id that never arrives is the registry's problem, not ours.
    pub fn children(&self) -> Vec<&str> {
        match self.properties.get("children") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl Serialize for ComponentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.kind, &self.properties)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ComponentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut entries = map.into_iter();
        let Some((kind, properties)) = entries.next() else {
            return Err(de::Error::custom(
                "component definition must have exactly one kind key",
            ));
        };
        if entries.next().is_some() {
            return Err(de::Error::custom(
                "component definition must have exactly one kind key",
            ));
        }
        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(de::Error::custom("component properties must be an object")),
        };
        Ok(Self { kind, properties })
    }
}
