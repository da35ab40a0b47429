//! The provider that owns all per-surface engine state, and the cheap-clone
//! handle front-ends use to reach it.
//!
//! There are no hidden process-wide singletons: every store hangs off an
//! explicit [`SurfaceProvider`], and dropping the provider invalidates every
//! [`EngineHandle`] cloned from it. A handle used after that point fails fast
//! with [`EngineError::ProviderGone`] — that is a wiring defect, not
//! recoverable runtime data.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde_json::Value;
use surface_protocol::{Action, ActionPayload, ComponentEntry, ServerMessage, ValueSource};

use crate::binding;
use crate::dispatch::{ActionCallback, ActionDispatcher};
use crate::error::{EngineError, Result};
use crate::interpolation::interpolate;
use crate::path::resolve_path;
use crate::store::{DataModelStore, Surface, SurfaceRegistry};
use crate::subscription::{DependencyIndex, component_dependencies};

struct ProviderInner {
    data: DataModelStore,
    surfaces: SurfaceRegistry,
    dependencies: DependencyIndex,
    dispatcher: ActionDispatcher,
}

/// Owns every store partition for the lifetime of a UI session.
pub struct SurfaceProvider {
    inner: Arc<ProviderInner>,
}

impl SurfaceProvider {
    /// A provider with no action callback; dispatches will log and complete.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ProviderBuilder {
        ProviderBuilder { on_action: None }
    }

    /// Handle for renderers and hosts. Cheap to clone; outliving the provider
    /// is allowed but every call after that fails with a descriptive error.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for SurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a [`SurfaceProvider`], installing the optional host callback.
pub struct ProviderBuilder {
    on_action: Option<ActionCallback>,
}

impl ProviderBuilder {
    /// Registers the single host callback that receives resolved
    /// [`ActionPayload`]s.
    #[must_use]
    pub fn on_action(mut self, callback: impl Fn(ActionPayload) + Send + Sync + 'static) -> Self {
        self.on_action = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> SurfaceProvider {
        SurfaceProvider {
            inner: Arc::new(ProviderInner {
                data: DataModelStore::new(),
                surfaces: SurfaceRegistry::new(),
                dependencies: DependencyIndex::new(),
                dispatcher: ActionDispatcher::new(self.on_action),
            }),
        }
    }
}

/// Client-facing handle to the synchronization engine.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Weak<ProviderInner>,
}

impl EngineHandle {
    fn inner(&self) -> Result<Arc<ProviderInner>> {
        self.inner.upgrade().ok_or(EngineError::ProviderGone)
    }

    /// Applies one inbound protocol message to the owning stores.
    pub fn apply_message(&self, message: ServerMessage) -> Result<()> {
        let inner = self.inner()?;
        tracing::debug!(
            kind = message.kind(),
            surface = message.surface_id(),
            "applying protocol message"
        );
        match message {
            ServerMessage::BeginRendering {
                surface_id,
                root,
                styles,
            } => {
                // the data model root exists from the first init onwards
                inner.data.ensure(&surface_id)?;
                inner.surfaces.init_surface(&surface_id, &root, styles)
            }
            ServerMessage::SurfaceUpdate {
                surface_id,
                components,
            } => {
                register_dependencies_for(&inner, &surface_id, &components)?;
                inner.surfaces.update_surface(&surface_id, components)
            }
            ServerMessage::DataModelUpdate {
                surface_id,
                path,
                contents,
            } => {
                inner.data.apply_update(&surface_id, path.as_deref(), &contents)?;
                let base = path.as_deref().unwrap_or("").trim_end_matches('/');
                for entry in &contents {
                    let changed = format!("{base}/{key}", key = entry.key);
                    inner.dependencies.invalidate(&surface_id, &changed)?;
                }
                Ok(())
            }
        }
    }

    /// Reads the data model value at `path`; unknown surfaces and missing
    /// paths yield `Ok(None)`.
    pub fn get_data_value(&self, surface_id: &str, path: &str) -> Result<Option<Value>> {
        self.inner()?.data.get(surface_id, path)
    }

    /// Writes a data model value and invalidates its dependents.
    ///
    /// This is the write-back half of two-way binding: the write is
    /// immediately observable by any other reader of the same path.
    pub fn set_data_value(&self, surface_id: &str, path: &str, value: Value) -> Result<()> {
        let inner = self.inner()?;
        let absolute = resolve_path(path, None);
        inner.data.set(surface_id, &absolute, value)?;
        inner.dependencies.invalidate(surface_id, &absolute)?;
        Ok(())
    }

    /// Clones the surface out of the registry, or `None` if unknown.
    pub fn get_surface(&self, surface_id: &str) -> Result<Option<Surface>> {
        self.inner()?.surfaces.get_surface(surface_id)
    }

    /// Ids of surfaces that currently have a root component.
    pub fn renderable_surfaces(&self) -> Result<Vec<String>> {
        self.inner()?.surfaces.renderable_surfaces()
    }

    /// Interpolates a template against the surface's current data model.
    ///
    /// The whole template resolves under one read guard, so a concurrent
    /// write-back can never produce a half-updated result.
    pub fn interpolate(
        &self,
        surface_id: &str,
        template: &str,
        base_path: Option<&str>,
    ) -> Result<String> {
        self.inner()?.data.with_model(surface_id, |model| {
            interpolate(template, model.unwrap_or(&Value::Null), base_path)
        })
    }

    /// Resolves a value source against the surface's current data model.
    pub fn resolve_source(&self, surface_id: &str, source: &ValueSource) -> Result<Option<Value>> {
        self.inner()?
            .data
            .with_model(surface_id, |model| binding::resolve_source(model, source))
    }

    /// Resolves a string property the way display components consume it.
    pub fn resolve_string(
        &self,
        surface_id: &str,
        source: &ValueSource,
        base_path: Option<&str>,
        default: &str,
    ) -> Result<String> {
        self.inner()?.data.with_model(surface_id, |model| {
            binding::resolve_string(model, source, base_path, default)
        })
    }

    /// Resolves the action's context and delivers the payload to the host.
    ///
    /// Context resolution runs under a single read guard: every entry
    /// observes the same data model snapshot. Delivery happens after the
    /// guard is released, so the callback may call back into the engine —
    /// including write-backs through any handle. A missing host callback
    /// logs a warning; it is never an error.
    pub fn dispatch_action(
        &self,
        surface_id: &str,
        component_id: &str,
        action: &Action,
    ) -> Result<()> {
        let inner = self.inner()?;
        let payload = inner.data.with_model(surface_id, |model| {
            ActionDispatcher::resolve(surface_id, component_id, action, model)
        })?;
        inner.dispatcher.deliver(payload);
        Ok(())
    }

    /// Replaces the registered dependency paths for a component, for
    /// renderers that evaluate templates outside `surfaceUpdate` handling or
    /// against a non-root base path (automatic registration resolves relative
    /// expressions root-relative).
    pub fn register_dependencies(
        &self,
        surface_id: &str,
        component_id: &str,
        paths: Vec<String>,
    ) -> Result<()> {
        self.inner()?
            .dependencies
            .register(surface_id, component_id, paths)
    }

    /// Drains the component ids marked dirty since the last drain.
    pub fn take_invalidated(&self, surface_id: &str) -> Result<Vec<String>> {
        self.inner()?.dependencies.take_dirty(surface_id)
    }
}

/// Registers the dependency paths of each incoming component definition so
/// data writes can invalidate exactly the components that read them.
fn register_dependencies_for(
    inner: &ProviderInner,
    surface_id: &str,
    components: &[ComponentEntry],
) -> Result<()> {
    for entry in components {
        let paths = component_dependencies(&entry.component);
        inner.dependencies.register(surface_id, &entry.id, paths)?;
    }
    Ok(())
}
