//! Surface registry: component maps and root pointers per surface id.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use surface_protocol::{ComponentEntry, ComponentNode};

use crate::error::{EngineError, Result};

/// One independently addressable UI instance.
#[derive(Clone, Debug, Default)]
pub struct Surface {
    pub id: String,

    /// Root component id. Surfaces without a root have received component
    /// definitions but no `beginRendering` yet and are not renderable.
    pub root: Option<String>,

    /// Component definitions by id. Only ever upserted, never implicitly
    /// cleared; a child id with no entry here renders as absent.
    pub components: HashMap<String, ComponentNode>,

    pub styles: HashMap<String, String>,
}

impl Surface {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// Looks up a component definition; dangling references resolve to `None`.
    pub fn component(&self, component_id: &str) -> Option<&ComponentNode> {
        self.components.get(component_id)
    }

    pub fn is_renderable(&self) -> bool {
        self.root.is_some()
    }
}

/// Owns every surface's component tree and root pointer.
///
/// Independent of the data model store; the renderer collaborator walks the
/// component map read-side while the data store answers its bound lookups.
pub struct SurfaceRegistry {
    surfaces: RwLock<HashMap<String, Surface>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self {
            surfaces: RwLock::new(HashMap::new()),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Surface>>> {
        self.surfaces
            .read()
            .map_err(|_| EngineError::StorePoisoned { store: "surface" })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Surface>>> {
        self.surfaces
            .write()
            .map_err(|_| EngineError::StorePoisoned { store: "surface" })
    }

    /// Creates the surface if absent and sets its root and styles.
    ///
    /// Re-initializing an existing surface overwrites `root` and `styles` but
    /// preserves already-delivered components, consistent with
    /// [`update_surface`](Self::update_surface)'s upsert policy.
    pub fn init_surface(
        &self,
        surface_id: &str,
        root: &str,
        styles: HashMap<String, String>,
    ) -> Result<()> {
        let mut surfaces = self.write_guard()?;
        let surface = surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| Surface::new(surface_id));
        surface.root = Some(root.to_string());
        surface.styles = styles;
        tracing::debug!(surface = surface_id, root, "surface initialized");
        Ok(())
    }

    /// Upserts component entries into the surface's component map.
    ///
    /// Entries not named are left untouched. An unknown surface is created on
    /// the spot: component updates may arrive before `beginRendering`, and
    /// the surface simply stays rootless until that message lands.
    pub fn update_surface(&self, surface_id: &str, entries: Vec<ComponentEntry>) -> Result<()> {
        let mut surfaces = self.write_guard()?;
        let surface = surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| Surface::new(surface_id));
        let count = entries.len();
        for entry in entries {
            surface.components.insert(entry.id, entry.component);
        }
        tracing::debug!(surface = surface_id, components = count, "surface updated");
        Ok(())
    }

    /// Clones the surface out of the registry, or `None` if unknown.
    pub fn get_surface(&self, surface_id: &str) -> Result<Option<Surface>> {
        let surfaces = self.read_guard()?;
        Ok(surfaces.get(surface_id).cloned())
    }

    /// Runs `f` against the surface under the read guard, avoiding the clone.
    pub fn with_surface<T>(
        &self,
        surface_id: &str,
        f: impl FnOnce(Option<&Surface>) -> T,
    ) -> Result<T> {
        let surfaces = self.read_guard()?;
        Ok(f(surfaces.get(surface_id)))
    }

    /// Ids of surfaces that currently have a root, in no particular order.
    ///
    /// Rootless surfaces are excluded: the renderer has nothing to walk yet.
    pub fn renderable_surfaces(&self) -> Result<Vec<String>> {
        let surfaces = self.read_guard()?;
        Ok(surfaces
            .values()
            .filter(|surface| surface.is_renderable())
            .map(|surface| surface.id.clone())
            .collect())
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
