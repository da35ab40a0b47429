//! Reactive synchronization engine for protocol-driven UI surfaces.
//!
//! This crate keeps live, two-way-bound state for UIs described remotely via
//! `surface-protocol` messages. Consumers embed a [`SurfaceProvider`] that
//! owns every per-surface store, and reach it through cheap-clone
//! [`EngineHandle`]s to apply messages, read and write data model values,
//! interpolate templates, and dispatch actions back to the host.
//!
//! Modules are organized by responsibility:
//! - [`path`] hosts pure path resolution over JSON trees
//! - [`interpolation`] parses and resolves `${path}` templates
//! - [`store`] owns per-surface data models and component registries
//! - [`binding`] resolves literal-vs-bound property values
//! - [`subscription`] tracks path dependencies for reactive invalidation
//! - [`dispatch`] delivers resolved action payloads to the host callback
//! - [`provider`] ties the stores together behind an explicit lifecycle
pub mod binding;
pub mod dispatch;
pub mod error;
pub mod interpolation;
pub mod path;
pub mod provider;
pub mod store;
pub mod subscription;

pub use binding::{resolve_bool, resolve_number, resolve_source, resolve_string};
pub use dispatch::{ActionCallback, ActionDispatcher};
pub use error::{EngineError, Result};
pub use interpolation::{
    has_interpolation, interpolate, interpolation_dependencies, parse_interpolation,
};
pub use path::{get_value_by_path, resolve_path, set_value_by_path};
pub use provider::{EngineHandle, ProviderBuilder, SurfaceProvider};
pub use store::{DataModelStore, Surface, SurfaceRegistry};
pub use subscription::DependencyIndex;
