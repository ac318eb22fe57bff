//! Schema-validated capability registry for ClearPlate.
//!
//! A capability is a named unit an external agent runtime can either invoke
//! (a tool) or ask the presentation layer to render (a component). This crate
//! knows nothing about the concrete capabilities; it only provides the table,
//! the schema model, and the dispatch contract around them.

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod schema;

pub use dispatch::Dispatcher;
pub use error::{DispatchError, RegistryError, ToolError};
pub use registry::{
    CapabilityDefinition, CapabilityDescriptor, CapabilityKind, CapabilityRegistry, ToolHandler,
};
pub use schema::{Field, Schema, Violation};
