//! Action descriptions and the resolved payloads delivered to the host.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::ValueSource;

/// A named event attached to an interactive component.
///
/// Actions are stateless descriptions: the context entries are resolved fresh
/// against the surface's data model at dispatch time, never ahead of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,

    /// Ordered context entries. Order matters: when two entries share a key,
    /// the later one wins at resolution time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextEntry>,
}

impl Action {
    /// An action with an empty context.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: Vec::new(),
        }
    }
}

/// One key/value pair of an action's context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: ValueSource,
}

/// Fully resolved action handed to the host callback.
///
/// Ephemeral: constructed once per dispatch and discarded after delivery.
/// Two dispatches of the same [`Action`] produce two independent payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub surface_id: String,
    pub name: String,
    /// Context keys mapped to their resolved JSON values.
    pub context: Map<String, Value>,
    /// Id of the component the interaction originated from.
    pub source_component_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_wire_shape() {
        let action = Action {
            name: "submit".into(),
            context: vec![ContextEntry {
                key: "name".into(),
                value: ValueSource::Path("/name".into()),
            }],
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"name": "submit", "context": [{"key": "name", "value": {"path": "/name"}}]})
        );
    }

    #[test]
    fn context_defaults_to_empty() {
        let action: Action = serde_json::from_value(json!({"name": "ping"})).unwrap();
        assert_eq!(action, Action::named("ping"));
        // and an empty context is omitted on the way out
        assert_eq!(serde_json::to_value(&action).unwrap(), json!({"name": "ping"}));
    }

    #[test]
    fn payload_wire_shape() {
        let payload = ActionPayload {
            surface_id: "s1".into(),
            name: "submit".into(),
            context: Map::new(),
            source_component_id: "button-1".into(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "surfaceId": "s1",
                "name": "submit",
                "context": {},
                "sourceComponentId": "button-1"
            })
        );
    }
}
