//! Capability descriptors and the registry that holds them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, ToolError};
use crate::schema::Schema;

/// Callable behind a tool.
///
/// Handlers receive arguments that already passed the tool's input schema.
pub trait ToolHandler: Send + Sync {
    /// Run the tool.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot complete.
    fn call(&self, args: Value) -> Result<Value, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(Value) -> Result<Value, ToolError> + Send + Sync,
{
    fn call(&self, args: Value) -> Result<Value, ToolError> {
        self(args)
    }
}

/// What a capability is and what it carries.
pub enum CapabilityKind {
    /// Invocable by the agent; input and output are schema-checked.
    Tool {
        input: Schema,
        output: Schema,
        handler: Arc<dyn ToolHandler>,
    },
    /// Rendered by the presentation layer; only the props are checked.
    Component {
        props: Schema,
        /// Opaque reference to the renderer, never invoked here.
        renderer: String,
    },
}

impl fmt::Debug for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tool { input, output, .. } => f
                .debug_struct("Tool")
                .field("input", input)
                .field("output", output)
                .finish_non_exhaustive(),
            Self::Component { props, renderer } => f
                .debug_struct("Component")
                .field("props", props)
                .field("renderer", renderer)
                .finish(),
        }
    }
}

/// A named, schema-described capability.
#[derive(Debug)]
pub struct CapabilityDescriptor {
    /// Unique name within the registry.
    pub name: String,
    /// Advisory text used by the agent runtime to pick capabilities.
    pub description: String,
    pub kind: CapabilityKind,
}

impl CapabilityDescriptor {
    /// Describe a tool.
    pub fn tool(
        name: impl Into<String>,
        description: impl Into<String>,
        input: Schema,
        output: Schema,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CapabilityKind::Tool {
                input,
                output,
                handler: Arc::new(handler),
            },
        }
    }

    /// Describe a component.
    pub fn component(
        name: impl Into<String>,
        description: impl Into<String>,
        props: Schema,
        renderer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CapabilityKind::Component {
                props,
                renderer: renderer.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_tool(&self) -> bool {
        matches!(self.kind, CapabilityKind::Tool { .. })
    }

    /// Introspection view with schemas rendered as JSON Schema.
    #[must_use]
    pub fn definition(&self) -> CapabilityDefinition {
        let (kind, input_schema, output_schema, props_schema) = match &self.kind {
            CapabilityKind::Tool { input, output, .. } => (
                "tool",
                Some(input.to_json_schema()),
                Some(output.to_json_schema()),
                None,
            ),
            CapabilityKind::Component { props, .. } => {
                ("component", None, None, Some(props.to_json_schema()))
            }
        };

        CapabilityDefinition {
            name: self.name.clone(),
            kind: kind.to_string(),
            description: self.description.clone(),
            input_schema,
            output_schema,
            props_schema,
        }
    }
}

/// Serializable description of a capability, as handed to the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDefinition {
    pub name: String,
    /// `tool` or `component`.
    pub kind: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_schema: Option<Value>,
}

/// Table of capabilities keyed by name, in registration order.
///
/// Filled once at startup; there is no way to remove or replace an entry.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    entries: Vec<CapabilityDescriptor>,
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        tracing::debug!(
            capability = %descriptor.name,
            tool = descriptor.is_tool(),
            "registered capability"
        );
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    /// Get a capability by name, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Look up a capability by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no capability has this name.
    pub fn lookup(&self, name: &str) -> Result<&CapabilityDescriptor, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Iterate over all capabilities in registration order.
    pub fn list(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.entries.iter()
    }

    /// Introspection view of every capability.
    #[must_use]
    pub fn definitions(&self) -> Vec<CapabilityDefinition> {
        self.list().map(CapabilityDescriptor::definition).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
