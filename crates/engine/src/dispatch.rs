//! Action dispatch to the host-registered callback.

use serde_json::{Map, Value};
use surface_protocol::{Action, ActionPayload};

use crate::binding::resolve_source;

/// Host callback invoked synchronously with each resolved payload.
///
/// At most one callback exists per provider; its return value is not
/// consumed.
pub type ActionCallback = Box<dyn Fn(ActionPayload) + Send + Sync>;

/// Resolves action context against one model snapshot and forwards the
/// finished payload to the host.
///
/// The dispatcher is stateless across dispatches: calling it twice produces
/// two independent payload deliveries.
pub struct ActionDispatcher {
    on_action: Option<ActionCallback>,
}

impl ActionDispatcher {
    /// A dispatcher with an explicit optional callback. `None` means every
    /// dispatch logs a diagnostic and completes as a no-op delivery.
    pub fn new(on_action: Option<ActionCallback>) -> Self {
        Self { on_action }
    }

    pub fn has_callback(&self) -> bool {
        self.on_action.is_some()
    }

    /// Resolves the action's context against one model snapshot.
    ///
    /// `model` should be read under a single guard so every context entry
    /// observes the same point-in-time state. Entries resolve in list order;
    /// later duplicate keys overwrite earlier ones; unresolved entries land
    /// as JSON null.
    pub fn resolve(
        surface_id: &str,
        component_id: &str,
        action: &Action,
        model: Option<&Value>,
    ) -> ActionPayload {
        let mut context = Map::new();
        for entry in &action.context {
            let resolved = resolve_source(model, &entry.value).unwrap_or(Value::Null);
            context.insert(entry.key.clone(), resolved);
        }

        ActionPayload {
            surface_id: surface_id.to_string(),
            name: action.name.clone(),
            context,
            source_component_id: component_id.to_string(),
        }
    }

    /// Delivers a resolved payload to the host callback.
    ///
    /// The caller must hold no store guard here: the callback is free to call
    /// back into the engine, including data model write-backs.
    pub fn deliver(&self, payload: ActionPayload) {
        match &self.on_action {
            Some(callback) => {
                tracing::debug!(
                    surface = %payload.surface_id,
                    component = %payload.source_component_id,
                    action = %payload.name,
                    "dispatching action"
                );
                callback(payload);
            }
            None => {
                tracing::warn!(
                    surface = %payload.surface_id,
                    action = %payload.name,
                    "action dispatched but no host callback is registered"
                );
            }
        }
    }

    /// Resolve-and-deliver in one call, for callers holding no locks.
    pub fn dispatch(
        &self,
        surface_id: &str,
        component_id: &str,
        action: &Action,
        model: Option<&Value>,
    ) {
        self.deliver(Self::resolve(surface_id, component_id, action, model));
    }
}
