//! Composition root: one focus store, one registry, one dispatcher.

use std::sync::Arc;

use capability_core::{CapabilityDefinition, DispatchError, Dispatcher, RegistryError, ToolError};
use serde_json::Value;

use super::catalog::{self, WEEKLY_FOCUS_BOARD};
use super::error::{Error, Result};
use super::focus::{FocusItem, FocusPatch, FocusStore};
use super::storage::{BlobStore, MemoryStorage, Storage};
use crate::config::{StoreBackend, StoreConfig};

/// The capability surface exposed to the agent runtime.
#[derive(Debug, Clone)]
pub struct Dashboard {
    store: Arc<FocusStore>,
    dispatcher: Dispatcher,
}

impl Dashboard {
    /// Register every capability against `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog registers a name twice.
    pub fn new(store: Arc<FocusStore>) -> std::result::Result<Self, RegistryError> {
        let registry = catalog::build_registry(&store)?;
        Ok(Self {
            store,
            dispatcher: Dispatcher::new(Arc::new(registry)),
        })
    }

    /// Dashboard over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog registers a name twice.
    pub fn in_memory() -> std::result::Result<Self, RegistryError> {
        Self::new(Arc::new(FocusStore::in_memory()))
    }

    /// Build the store described by `config` and register against it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage location cannot be determined.
    pub fn from_config(config: &StoreConfig) -> anyhow::Result<Self> {
        let blobs: Arc<dyn BlobStore> = match config.backend {
            StoreBackend::Memory => Arc::new(MemoryStorage::new()),
            StoreBackend::File => Arc::new(Storage::with_root(config.root_dir()?)),
        };

        tracing::debug!(backend = ?config.backend, key = %config.key, strict_ids = config.strict_ids, "opening focus store");

        let store = FocusStore::new(blobs)
            .with_key(config.key.clone())
            .with_strict_ids(config.strict_ids);
        Ok(Self::new(Arc::new(store))?)
    }

    #[must_use]
    pub fn store(&self) -> &FocusStore {
        &self.store
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Introspection view of every capability.
    #[must_use]
    pub fn definitions(&self) -> Vec<CapabilityDefinition> {
        self.dispatcher.registry().definitions()
    }

    /// Invoke a tool.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::invoke`].
    pub fn invoke(&self, name: &str, args: &Value) -> std::result::Result<Value, DispatchError> {
        self.dispatcher.invoke(name, args)
    }

    /// Invoke a tool with arguments given as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `args` is not JSON or the invocation fails.
    pub fn invoke_json(&self, name: &str, args: &str) -> Result<Value> {
        let args: Value = serde_json::from_str(args)?;
        Ok(self.invoke(name, &args)?)
    }

    /// Render a component with props given as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `props` is not JSON or the render fails.
    pub fn render_json(&self, name: &str, props: &str) -> Result<Value> {
        let props: Value = serde_json::from_str(props)?;
        Ok(self.render(name, &props)?)
    }

    /// Patch one focus item, failing when no item has `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFocusItem`] for an absent id, or the store error.
    pub fn edit_focus(&self, id: &str, patch: &FocusPatch) -> Result<Vec<FocusItem>> {
        self.store
            .update_existing(id, patch)?
            .ok_or_else(|| Error::UnknownFocusItem(id.to_string()))
    }

    /// Validate component props for the renderer.
    ///
    /// A `WeeklyFocusBoard` with a non-empty `items` list becomes the new
    /// focus collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is unknown, the props are invalid,
    /// or the board's items cannot be stored.
    pub fn render(&self, name: &str, props: &Value) -> std::result::Result<Value, DispatchError> {
        let props = self.dispatcher.render(name, props)?;

        if name == WEEKLY_FOCUS_BOARD {
            self.sync_board(&props)
                .map_err(|source| DispatchError::Handler {
                    name: name.to_string(),
                    source,
                })?;
        }

        Ok(props)
    }

    fn sync_board(&self, props: &Value) -> std::result::Result<(), ToolError> {
        let Some(items) = props.get("items") else {
            return Ok(());
        };

        let items: Vec<FocusItem> = serde_json::from_value(items.clone())?;
        if !items.is_empty() {
            self.store.replace_all(&items)?;
        }
        Ok(())
    }
}
