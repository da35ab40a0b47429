//! Wire types for the declarative UI surface protocol.
//!
//! `surface-protocol` defines the canonical message and value shapes exchanged
//! between a remote UI-producing process and the client-side synchronization
//! engine. It is a pure types crate: serde models, no state, no I/O. The
//! stateful engine lives in `surface-engine` and consumes the types
//! re-exported here.
//!
//! Modules are organized by responsibility:
//! - [`message`] holds the inbound protocol messages
//! - [`component`] holds the component-node wire shape and typed accessors
//! - [`value`] holds the tagged value unions (literal-vs-bound, scalar kinds)
//! - [`action`] holds action descriptions and resolved payloads
pub mod action;
pub mod component;
pub mod message;
pub mod value;

pub use action::{Action, ActionPayload, ContextEntry};
pub use component::ComponentNode;
pub use message::{ComponentEntry, DataEntry, ServerMessage};
pub use value::{DataValue, ValueSource};
