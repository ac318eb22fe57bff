//! Capability error types.

use crate::schema::Violation;

/// Registry construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A capability with this name is already registered.
    #[error("capability already registered: {0}")]
    DuplicateName(String),

    /// No capability with this name exists.
    #[error("unknown capability: {0}")]
    NotFound(String),
}

/// Failure reported by a tool handler.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Validated arguments could not be mapped onto the handler's input type.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The handler's backing data rejected the operation.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Any other handler failure.
    #[error("{0}")]
    Failed(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

/// Errors returned by [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Unknown capability name.
    #[error("unknown capability: {0}")]
    NotFound(String),

    /// The capability exists but is a component.
    #[error("{0} is a component, not a tool")]
    NotATool(String),

    /// The capability exists but is a tool.
    #[error("{0} is a tool, not a component")]
    NotAComponent(String),

    /// Caller-supplied arguments did not match the declared schema.
    #[error("invalid arguments for {name}: {}", join(violations))]
    Validation {
        name: String,
        violations: Vec<Violation>,
    },

    /// The handler returned a value that breaks its own output schema.
    #[error("{name} violated its output contract: {}", join(violations))]
    ContractViolation {
        name: String,
        violations: Vec<Violation>,
    },

    /// The handler itself failed.
    #[error("{name} failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: ToolError,
    },
}

impl DispatchError {
    /// Short machine-readable kind, stable across releases.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NotATool(_) => "not_a_tool",
            Self::NotAComponent(_) => "not_a_component",
            Self::Validation { .. } => "validation",
            Self::ContractViolation { .. } => "contract_violation",
            Self::Handler { .. } => "handler",
        }
    }

    /// Field-level violations, if any.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations, .. } | Self::ContractViolation { violations, .. } => {
                violations
            }
            _ => &[],
        }
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
