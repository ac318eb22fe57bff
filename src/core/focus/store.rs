//! Persisted focus-item collection.
//!
//! The whole collection lives in one JSON blob, so every mutation rewrites
//! it. Load, mutate and persist run under a single per-store mutex; two
//! processes sharing the same blob can still overwrite each other.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use super::{FocusItem, FocusPatch, default_focus_items};
use crate::core::storage::{BlobStore, MemoryStorage, StorageError};

/// Blob key holding the focus collection.
pub const FOCUS_ITEMS_KEY: &str = "clearplate_focus_items_v1";

/// Focus store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Strict mode refused a collection with repeated ids.
    #[error("duplicate focus item ids: {}", .duplicates.join(", "))]
    ConstraintViolation { duplicates: Vec<String> },

    /// The blob could not be written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The collection could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Ordered focus items keyed by id, persisted as one blob.
pub struct FocusStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
    strict_ids: bool,
    lock: Mutex<()>,
}

impl std::fmt::Debug for FocusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusStore")
            .field("key", &self.key)
            .field("strict_ids", &self.strict_ids)
            .finish_non_exhaustive()
    }
}

impl FocusStore {
    /// Create a permissive store over `blobs` using the default key.
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            key: FOCUS_ITEMS_KEY.to_string(),
            strict_ids: false,
            lock: Mutex::new(()),
        }
    }

    /// Create a store backed by fresh in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Use a different blob key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Reject collections with duplicate ids on replace and update.
    #[must_use]
    pub const fn with_strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict_ids
    }

    /// Current collection.
    ///
    /// Missing or unreadable state falls back to the default set, which is
    /// then persisted. Never fails.
    #[must_use]
    pub fn load_all(&self) -> Vec<FocusItem> {
        let _guard = self.lock.lock();
        self.load_locked()
    }

    fn load_locked(&self) -> Vec<FocusItem> {
        match self.blobs.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => return items,
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "corrupt focus items, using defaults");
                }
            },
            Ok(None) => {
                tracing::debug!(key = %self.key, "no focus items stored, seeding defaults");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read focus items, using defaults");
            }
        }

        let defaults = default_focus_items();
        if let Err(e) = self.persist(&defaults) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist default focus items");
        }
        defaults
    }

    fn persist(&self, items: &[FocusItem]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(items)?;
        self.blobs.set(&self.key, &json)?;
        Ok(())
    }

    fn check_unique(&self, items: &[FocusItem]) -> Result<(), StoreError> {
        if !self.strict_ids {
            return Ok(());
        }

        let duplicates = duplicate_ids(items);
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(StoreError::ConstraintViolation { duplicates })
        }
    }

    /// Persist `items` verbatim as the new collection.
    ///
    /// # Errors
    ///
    /// Returns error if strict mode finds duplicate ids or the write fails.
    pub fn replace_all(&self, items: &[FocusItem]) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        self.check_unique(items)?;
        self.persist(items)?;
        tracing::info!(count = items.len(), "replaced focus items");
        Ok(())
    }

    /// Merge `patch` into every item with `id` and return the full collection.
    ///
    /// An unknown id leaves the collection untouched and returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if strict mode finds duplicate ids or the write fails.
    pub fn update_by_id(&self, id: &str, patch: &FocusPatch) -> Result<Vec<FocusItem>, StoreError> {
        let _guard = self.lock.lock();
        let (items, _) = self.update_locked(id, patch)?;
        Ok(items)
    }

    /// Like [`Self::update_by_id`], but `None` when no item has `id`.
    ///
    /// # Errors
    ///
    /// Returns error if strict mode finds duplicate ids or the write fails.
    pub fn update_existing(
        &self,
        id: &str,
        patch: &FocusPatch,
    ) -> Result<Option<Vec<FocusItem>>, StoreError> {
        let _guard = self.lock.lock();
        let (items, matched) = self.update_locked(id, patch)?;
        Ok((matched > 0).then_some(items))
    }

    fn update_locked(
        &self,
        id: &str,
        patch: &FocusPatch,
    ) -> Result<(Vec<FocusItem>, usize), StoreError> {
        let mut items = self.load_locked();

        let mut matched = 0;
        for item in items.iter_mut().filter(|item| item.id == id) {
            patch.apply(item);
            matched += 1;
        }

        if matched == 0 {
            tracing::warn!(id = %id, "no focus item with this id, collection unchanged");
            return Ok((items, 0));
        }

        self.check_unique(&items)?;
        self.persist(&items)?;
        tracing::info!(id = %id, matched, "updated focus item");
        Ok((items, matched))
    }

    /// Discard the current collection and persist the default set.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        self.persist(&default_focus_items())?;
        tracing::info!("reset focus items to defaults");
        Ok(())
    }
}

/// Ids occurring more than once, in order of their first repeat.
fn duplicate_ids(items: &[FocusItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for item in items {
        if !seen.insert(item.id.as_str()) && !duplicates.contains(&item.id) {
            duplicates.push(item.id.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::focus::Bucket;
    use crate::core::storage::Storage;

    fn store_with(blobs: Arc<MemoryStorage>) -> FocusStore {
        FocusStore::new(blobs)
    }

    #[test]
    fn first_load_seeds_and_persists_defaults() {
        let blobs = Arc::new(MemoryStorage::new());
        let store = store_with(blobs.clone());

        assert_eq!(store.load_all(), default_focus_items());
        assert!(blobs.get(FOCUS_ITEMS_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let blobs = Arc::new(MemoryStorage::new());
        blobs.set(FOCUS_ITEMS_KEY, "{not json").unwrap();
        let store = store_with(blobs.clone());

        assert_eq!(store.load_all(), default_focus_items());
        let raw = blobs.get(FOCUS_ITEMS_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<FocusItem>>(&raw).is_ok());
    }

    #[test]
    fn wrong_shape_counts_as_corrupt() {
        let blobs = Arc::new(MemoryStorage::new());
        blobs
            .set(FOCUS_ITEMS_KEY, r#"[{"id":"f1","bucket":"someday"}]"#)
            .unwrap();
        assert_eq!(store_with(blobs).load_all(), default_focus_items());
    }

    #[test]
    fn update_merges_and_persists() {
        let store = FocusStore::in_memory();
        let patch = FocusPatch {
            bucket: Some(Bucket::NextWeek),
            ..FocusPatch::default()
        };

        let items = store.update_by_id("f1", &patch).unwrap();
        assert_eq!(items[0].bucket, Bucket::NextWeek);
        assert_eq!(items[0].title, "Write a blog post");
        assert!(!items[0].done);
        assert_eq!(store.load_all(), items);
    }

    #[test]
    fn update_is_idempotent() {
        let store = FocusStore::in_memory();
        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };

        let once = store.update_by_id("f2", &patch).unwrap();
        let twice = store.update_by_id("f2", &patch).unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.load_all(), once);
    }

    #[test]
    fn unknown_id_returns_collection_unchanged() {
        let store = FocusStore::in_memory();
        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };

        let items = store.update_by_id("zzz", &patch).unwrap();
        assert_eq!(items, default_focus_items());
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn reset_discards_mutations() {
        let store = FocusStore::in_memory();
        store
            .update_by_id(
                "f4",
                &FocusPatch {
                    title: Some("Renamed".to_string()),
                    ..FocusPatch::default()
                },
            )
            .unwrap();
        store.replace_all(&[]).unwrap();
        assert!(store.load_all().is_empty());

        store.reset().unwrap();
        assert_eq!(store.load_all(), default_focus_items());
    }

    #[test]
    fn permissive_replace_accepts_duplicates() {
        let store = FocusStore::in_memory();
        let items = vec![
            FocusItem::new("a", "One", Bucket::ThisWeek),
            FocusItem::new("a", "Two", Bucket::NextWeek),
        ];
        store.replace_all(&items).unwrap();
        assert_eq!(store.load_all(), items);
    }

    #[test]
    fn permissive_update_patches_every_duplicate() {
        let store = FocusStore::in_memory();
        store
            .replace_all(&[
                FocusItem::new("a", "One", Bucket::ThisWeek),
                FocusItem::new("b", "Other", Bucket::ThisWeek),
                FocusItem::new("a", "Two", Bucket::NextWeek),
            ])
            .unwrap();
        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };

        let items = store.update_by_id("a", &patch).unwrap();
        assert!(items[0].done && items[2].done);
        assert!(!items[1].done);
        assert_eq!(items[2].title, "Two");
        assert_eq!(store.load_all(), items);
    }

    #[test]
    fn update_existing_reports_missing_id() {
        let store = FocusStore::in_memory();
        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };

        assert!(store.update_existing("zzz", &patch).unwrap().is_none());
        assert_eq!(store.load_all(), default_focus_items());

        let items = store.update_existing("f5", &patch).unwrap().unwrap();
        assert!(items[4].done);
    }

    #[test]
    fn strict_replace_rejects_duplicates() {
        let store = FocusStore::in_memory().with_strict_ids(true);
        let items = vec![
            FocusItem::new("a", "One", Bucket::ThisWeek),
            FocusItem::new("b", "Two", Bucket::ThisWeek),
            FocusItem::new("a", "Three", Bucket::NextWeek),
            FocusItem::new("a", "Four", Bucket::NextWeek),
        ];

        let err = store.replace_all(&items).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ConstraintViolation { ref duplicates } if duplicates == &["a"]
        ));
        assert_eq!(store.load_all(), default_focus_items());
    }

    #[test]
    fn strict_update_rejects_duplicate_state() {
        let blobs = Arc::new(MemoryStorage::new());
        let items = vec![
            FocusItem::new("a", "One", Bucket::ThisWeek),
            FocusItem::new("a", "Two", Bucket::ThisWeek),
        ];
        blobs
            .set(FOCUS_ITEMS_KEY, &serde_json::to_string(&items).unwrap())
            .unwrap();
        let store = store_with(blobs).with_strict_ids(true);

        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };
        assert!(store.update_by_id("a", &patch).is_err());
        assert_eq!(store.load_all(), items);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let store = Arc::new(FocusStore::in_memory());
        let patch = FocusPatch {
            done: Some(true),
            ..FocusPatch::default()
        };

        std::thread::scope(|scope| {
            for id in ["f1", "f2", "f3", "f4", "f5"] {
                let store = &store;
                let patch = &patch;
                scope.spawn(move || {
                    for _ in 0..20 {
                        store.update_by_id(id, patch).unwrap();
                    }
                });
            }
        });

        assert!(store.load_all().iter().all(|item| item.done));
    }

    #[test]
    fn file_backed_state_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobStore> = Arc::new(Storage::with_root(dir.path().to_path_buf()));

        let patch = FocusPatch {
            bucket: Some(Bucket::NextWeek),
            ..FocusPatch::default()
        };
        FocusStore::new(blobs.clone())
            .update_by_id("f3", &patch)
            .unwrap();

        let reopened = FocusStore::new(blobs);
        assert_eq!(reopened.load_all()[2].bucket, Bucket::NextWeek);
        assert!(dir.path().join(format!("{FOCUS_ITEMS_KEY}.json")).exists());
    }
}
