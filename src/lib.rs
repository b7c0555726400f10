//! MyCollector core.
//!
//! Keeps a user's card collections consistent across schema revisions and
//! edits. Raw documents of any prior shape are upgraded by the migration
//! engine, held by a pure reducer that applies one [`Action`] at a time, and
//! laid out into binder pages by the placement model. A pluggable
//! [`CollectionStore`] persists the full collection list per user.
//!
//! # Quick start
//!
//! ```
//! use mycollector_core::{Action, Collector};
//! use serde_json::json;
//!
//! let mut collector = Collector::builder().build().unwrap();
//! collector.load().unwrap();
//!
//! let raw = json!([{ "id": "set-1", "name": "Set One", "cards": [{ "id": "001", "name": "Pikachu" }] }]);
//! collector.dispatch(Action::LoadBackup(raw.as_array().unwrap().clone()));
//! collector.dispatch(Action::ToggleCollected {
//!     collection_id: "set-1".into(),
//!     card_id: "001".into(),
//! });
//! assert!(collector.collection("set-1").unwrap().cards[0].collected);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod backup;
pub mod binder;
pub mod config;
pub mod error;
pub mod import;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod reducer;
pub mod store;
pub mod style;

#[cfg(feature = "async")]
pub use async_client::AsyncCollector;
pub use binder::{BinderLayout, BinderView, PlacementRejection};
pub use error::{CollectorError, Result};
pub use migrate::Migrator;
pub use progress::{Progress, SetMode};
pub use reducer::{Action, CollectionsState, Reducer};
pub use store::{CollectionStore, DuckDbStore, FileStore, MemoryStore};

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use models::{Card, Collection, CustomFieldDefinition};

// ---------------------------------------------------------------------------
// CollectorBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Collector`].
///
/// Use [`Collector::builder()`] to obtain one.
#[derive(Default)]
pub struct CollectorBuilder {
    data_dir: Option<PathBuf>,
    store: Option<Box<dyn CollectionStore>>,
    catalog_ids: Option<HashSet<String>>,
    user_id: Option<String>,
    compress: bool,
}

impl CollectorBuilder {
    /// Directory for the default [`FileStore`].
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/mycollector` on Linux). Ignored when a store is given.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use `store` instead of the default file store.
    pub fn store<S: CollectionStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Ids of catalog collections, used to deduce `isCustom` on legacy data.
    pub fn catalog_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Signed-in user whose collections are loaded and saved.
    ///
    /// Without one the collector runs as a guest: it starts empty and never
    /// touches storage.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Gzip files written by the default file store. Defaults to `false`.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn build(self) -> Result<Collector> {
        let migrator = match self.catalog_ids {
            Some(ids) => Migrator::new(ids),
            None => Migrator::default(),
        };
        let store = match (self.store, &self.user_id) {
            (Some(store), _) => Some(store),
            (None, Some(_)) => {
                let dir = self.data_dir.unwrap_or_else(config::default_data_dir);
                Some(Box::new(FileStore::new(dir, self.compress)?) as Box<dyn CollectionStore>)
            }
            (None, None) => None,
        };
        Ok(Collector {
            reducer: Reducer::new(migrator),
            state: CollectionsState::default(),
            store,
            user_id: self.user_id,
            held_back: Vec::new(),
            dirty: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Owner of the collection state.
///
/// Every change goes through [`dispatch()`](Self::dispatch); persistence is
/// explicit via [`load()`](Self::load) and [`save()`](Self::save).
///
/// Stored documents that fail to migrate are held back unchanged and written
/// again on every save, so a document this version cannot read is never lost.
pub struct Collector {
    reducer: Reducer,
    state: CollectionsState,
    store: Option<Box<dyn CollectionStore>>,
    user_id: Option<String>,
    held_back: Vec<Value>,
    dirty: bool,
}

impl Collector {
    pub fn builder() -> CollectorBuilder {
        CollectorBuilder::default()
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Fetch and migrate the user's collections, replacing the current state.
    ///
    /// Documents that fail to migrate are held back (see
    /// [`held_back()`](Self::held_back)). Guests get an empty shelf.
    pub fn load(&mut self) -> Result<()> {
        let raws = match (&self.store, &self.user_id) {
            (Some(store), Some(user_id)) => store.fetch_collections(user_id)?,
            _ => Vec::new(),
        };
        let (collections, held_back) = self.reducer.migrator().migrate_partitioned(&raws);
        if !held_back.is_empty() {
            log::warn!(
                "Holding back {} stored collections that could not be migrated",
                held_back.len()
            );
        }
        self.held_back = held_back;
        let selected_collection_id = collections.first().map(|c| c.id.clone());
        self.state = self.reducer.reduce(
            &self.state,
            Action::SetInitialData {
                collections,
                selected_collection_id,
            },
        );
        self.dirty = false;
        Ok(())
    }

    /// Apply one action.
    ///
    /// [`Action::LoadBackup`] replaces the whole shelf, held-back documents
    /// included.
    pub fn dispatch(&mut self, action: Action) {
        if matches!(action, Action::LoadBackup(_)) && !self.held_back.is_empty() {
            self.held_back.clear();
            self.dirty = true;
        }
        let next = self.reducer.reduce(&self.state, action);
        if next != self.state {
            self.state = next;
            self.dirty = true;
        }
    }

    /// Persist the full collection list.
    ///
    /// Returns `false` without writing for guests. Saving before
    /// [`load()`](Self::load) is refused so an empty state never replaces
    /// stored data.
    pub fn save(&mut self) -> Result<bool> {
        let (Some(store), Some(user_id)) = (&self.store, &self.user_id) else {
            return Ok(false);
        };
        if !self.state.is_loaded {
            return Err(CollectorError::InvalidArgument(
                "collections must be loaded before saving".into(),
            ));
        }
        let mut documents = self
            .state
            .collections
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        documents.extend(self.held_back.iter().cloned());
        store.save_documents(user_id, &documents)?;
        self.dirty = false;
        Ok(true)
    }

    /// Whether there are changes since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // -- Accessors ---------------------------------------------------------

    pub fn state(&self) -> &CollectionsState {
        &self.state
    }

    pub fn collections(&self) -> &[Collection] {
        &self.state.collections
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.state.collection(id)
    }

    pub fn selected_collection(&self) -> Option<&Collection> {
        self.state.selected_collection()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Stored documents that failed to migrate on the last load. They are
    /// saved back after the migrated collections.
    pub fn held_back(&self) -> &[Value] {
        &self.held_back
    }

    pub fn migrator(&self) -> &Migrator {
        self.reducer.migrator()
    }

    fn require(&self, collection_id: &str) -> Result<&Collection> {
        self.collection(collection_id)
            .ok_or_else(|| CollectorError::NotFound(format!("collection '{collection_id}'")))
    }

    // -- Views -------------------------------------------------------------

    /// Binder pages for one collection.
    pub fn binder(&self, collection_id: &str, layout: BinderLayout) -> Result<BinderView<'_>> {
        Ok(BinderView::new(self.require(collection_id)?, layout))
    }

    pub fn progress(&self, collection_id: &str, mode: SetMode) -> Result<Progress> {
        Ok(progress::progress(self.require(collection_id)?, mode))
    }

    pub fn missing_items(&self, collection_id: &str, mode: SetMode) -> Result<Vec<progress::MissingItem>> {
        Ok(progress::missing_items(self.require(collection_id)?, mode))
    }

    // -- Import / export ---------------------------------------------------

    /// Build a custom collection from imported cards, add and select it.
    ///
    /// Returns the new collection's id.
    pub fn create_custom_collection(
        &mut self,
        title: &str,
        cards: Vec<Card>,
        custom_field_definitions: Vec<CustomFieldDefinition>,
        description: &str,
    ) -> Result<String> {
        let collection =
            import::new_custom_collection(self.migrator(), title, cards, custom_field_definitions, description)?;
        let id = collection.id.clone();
        self.dispatch(Action::AddCollection(collection));
        Ok(id)
    }

    /// Write every collection to a backup file.
    pub fn export_backup<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        backup::write_backup(path, &self.state.collections)
    }

    /// Replace all collections with a backup's contents.
    ///
    /// Returns the number of collections restored.
    pub fn import_backup<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let raws = backup::read_backup(path)?;
        self.dispatch(Action::LoadBackup(raws));
        Ok(self.state.collections.len())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Collector(store={}, user={}, collections={}, loaded={})",
            self.store.as_ref().map(|s| s.name()).unwrap_or("none"),
            self.user_id.as_deref().unwrap_or("guest"),
            self.state.collections.len(),
            self.state.is_loaded
        )
    }
}
