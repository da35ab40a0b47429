//! Per-surface state stores.
//!
//! Stores own the mutable engine state keyed by surface id:
//! - [`DataModelStore`] owns one JSON document per surface
//! - [`SurfaceRegistry`] owns one component map and root pointer per surface
//!
//! Surfaces never share or alias state; every partition is a separate map
//! entry, so mutating one surface cannot be observed through another.

mod data_model;
mod surface;

pub use data_model::DataModelStore;
pub use surface::{Surface, SurfaceRegistry};
