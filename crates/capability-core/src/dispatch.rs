//! Schema-validated dispatch over a [`CapabilityRegistry`].

use std::sync::Arc;

use serde_json::Value;

use crate::error::DispatchError;
use crate::registry::{CapabilityDescriptor, CapabilityKind, CapabilityRegistry};

/// Invokes tools and checks component props against their declared schemas.
///
/// A handler is never called with arguments that failed validation, and a
/// result is never returned without passing the tool's output schema.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    fn descriptor(&self, name: &str) -> Result<&CapabilityDescriptor, DispatchError> {
        self.registry
            .get(name)
            .ok_or_else(|| DispatchError::NotFound(name.to_string()))
    }

    /// Invoke the tool `name` with raw arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is unknown, the arguments fail the input
    /// schema, the handler fails, or the result fails the output schema.
    pub fn invoke(&self, name: &str, args: &Value) -> Result<Value, DispatchError> {
        let descriptor = self.descriptor(name)?;
        let CapabilityKind::Tool {
            input,
            output,
            handler,
        } = &descriptor.kind
        else {
            return Err(DispatchError::NotATool(name.to_string()));
        };

        let args = input.validate(args).map_err(|violations| {
            tracing::info!(tool = %name, violations = violations.len(), "rejected tool arguments");
            DispatchError::Validation {
                name: name.to_string(),
                violations,
            }
        })?;

        tracing::info!(tool = %name, "invoking tool");

        let result = handler
            .call(args)
            .map_err(|source| DispatchError::Handler {
                name: name.to_string(),
                source,
            })?;

        if let Err(violations) = output.conforms(&result) {
            tracing::error!(
                tool = %name,
                violations = ?violations,
                "tool result violates its output schema"
            );
            return Err(DispatchError::ContractViolation {
                name: name.to_string(),
                violations,
            });
        }

        Ok(result)
    }

    /// Check props for the component `name`, returning them coerced.
    ///
    /// The renderer itself is never called.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is unknown or the props fail its schema.
    pub fn render(&self, name: &str, props: &Value) -> Result<Value, DispatchError> {
        let descriptor = self.descriptor(name)?;
        let CapabilityKind::Component { props: schema, .. } = &descriptor.kind else {
            return Err(DispatchError::NotAComponent(name.to_string()));
        };

        schema
            .validate(props)
            .map_err(|violations| DispatchError::Validation {
                name: name.to_string(),
                violations,
            })
    }
}
