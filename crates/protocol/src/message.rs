//! Inbound protocol messages consumed by the synchronization engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::component::ComponentNode;
use crate::value::DataValue;

/// A message from the remote UI-producing process.
///
/// Wire form is externally tagged by operation:
///
/// ```json
/// {"beginRendering": {"surfaceId": "s1", "root": "root"}}
/// {"surfaceUpdate": {"surfaceId": "s1", "components": [{"id": "root", "component": {"Text": {}}}]}}
/// {"dataModelUpdate": {"surfaceId": "s1", "contents": [{"key": "name", "valueString": "John"}]}}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerMessage {
    /// Marks a surface ready to render: sets its root component and styles.
    #[serde(rename_all = "camelCase")]
    BeginRendering {
        surface_id: String,
        root: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        styles: HashMap<String, String>,
    },

    /// Upserts component definitions into a surface's component map.
    #[serde(rename_all = "camelCase")]
    SurfaceUpdate {
        surface_id: String,
        components: Vec<ComponentEntry>,
    },

    /// Merges scalar entries into the data model object at `path`
    /// (the model root when absent).
    #[serde(rename_all = "camelCase")]
    DataModelUpdate {
        surface_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        contents: Vec<DataEntry>,
    },
}

impl ServerMessage {
    /// The surface this message targets.
    pub fn surface_id(&self) -> &str {
        match self {
            Self::BeginRendering { surface_id, .. }
            | Self::SurfaceUpdate { surface_id, .. }
            | Self::DataModelUpdate { surface_id, .. } => surface_id,
        }
    }

    /// Static operation name, for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BeginRendering { .. } => "beginRendering",
            Self::SurfaceUpdate { .. } => "surfaceUpdate",
            Self::DataModelUpdate { .. } => "dataModelUpdate",
        }
    }
}

/// One `{id, component}` pair of a `surfaceUpdate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub component: ComponentNode,
}

/// One `{key, value*}` pair of a `dataModelUpdate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub key: String,
    #[serde(flatten)]
    pub value: DataValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn begin_rendering_wire_shape() {
        let wire = json!({"beginRendering": {"surfaceId": "s1", "root": "root"}});
        let msg: ServerMessage = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            msg,
            ServerMessage::BeginRendering {
                surface_id: "s1".into(),
                root: "root".into(),
                styles: HashMap::new(),
            }
        );
        assert_eq!(serde_json::to_value(&msg).unwrap(), wire);
        assert_eq!(msg.kind(), "beginRendering");
        assert_eq!(msg.surface_id(), "s1");
    }

    #[test]
    fn surface_update_wire_shape() {
        let wire = json!({"surfaceUpdate": {
            "surfaceId": "s1",
            "components": [
                {"id": "root", "component": {"Column": {"children": ["text-1"]}}},
                {"id": "text-1", "component": {"Text": {"text": {"path": "/title"}}}}
            ]
        }});
        let msg: ServerMessage = serde_json::from_value(wire.clone()).unwrap();
        let ServerMessage::SurfaceUpdate { components, .. } = &msg else {
            panic!("expected surfaceUpdate");
        };
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].component.kind, "Column");
        assert_eq!(serde_json::to_value(&msg).unwrap(), wire);
    }

    #[test]
    fn data_model_update_wire_shape() {
        let wire = json!({"dataModelUpdate": {
            "surfaceId": "s1",
            "path": "/user",
            "contents": [
                {"key": "name", "valueString": "John"},
                {"key": "age", "valueNumber": 30},
                {"key": "active", "valueBoolean": true}
            ]
        }});
        let msg: ServerMessage = serde_json::from_value(wire.clone()).unwrap();
        let ServerMessage::DataModelUpdate { path, contents, .. } = &msg else {
            panic!("expected dataModelUpdate");
        };
        assert_eq!(path.as_deref(), Some("/user"));
        assert_eq!(contents[0].value, DataValue::String("John".into()));
        assert_eq!(contents[1].value, DataValue::Number(30.0));
        assert_eq!(contents[2].value, DataValue::Boolean(true));
        assert_eq!(serde_json::to_value(&msg).unwrap(), wire);
    }

    #[test]
    fn data_model_update_path_defaults_to_root() {
        let msg: ServerMessage = serde_json::from_value(json!({"dataModelUpdate": {
            "surfaceId": "s1",
            "contents": []
        }}))
        .unwrap();
        let ServerMessage::DataModelUpdate { path, .. } = msg else {
            panic!("expected dataModelUpdate");
        };
        assert_eq!(path, None);
    }
}
