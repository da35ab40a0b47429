//! Unified error types surfaced by the engine API.
//!
//! Lookup misses are not errors: unknown surfaces, missing paths, and dangling
//! component ids all resolve to `None` on the read path so renderers can treat
//! them as empty. The variants here indicate wiring defects — they are
//! expected to surface during development, not in steady-state operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An [`EngineHandle`](crate::EngineHandle) was used after its
    /// [`SurfaceProvider`](crate::SurfaceProvider) was dropped.
    #[error("engine handle used after its surface provider was shut down")]
    ProviderGone,

    /// A store lock was poisoned by a panicking writer.
    #[error("{store} store lock poisoned by a panicked writer")]
    StorePoisoned { store: &'static str },
}

impl EngineError {
    /// Every current variant is fatal: recoverable conditions (missing data,
    /// unregistered callback) never construct an error in the first place.
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::ProviderGone | Self::StorePoisoned { .. } => true,
        }
    }
}
