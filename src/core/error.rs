//! Error types for the core module.

use capability_core::{DispatchError, RegistryError};

use super::focus::StoreError;

/// Core error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Capability catalog could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Tool invocation or component render failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Focus store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Caller-supplied JSON did not parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No focus item carries this id.
    #[error("no focus item with id {0}")]
    UnknownFocusItem(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_are_transparent() {
        let err = Error::from(RegistryError::DuplicateName("get-deadlines".to_string()));
        assert_eq!(
            err.to_string(),
            RegistryError::DuplicateName("get-deadlines".to_string()).to_string()
        );
    }

    #[test]
    fn json_errors_are_prefixed() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::from(parse).to_string().starts_with("invalid JSON: "));
    }
}
