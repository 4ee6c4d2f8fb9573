//! Database facade: catalog + store, one entry point.

use tracing::info;

use crate::catalog::Catalog;
use crate::compose::ComposeResolver;
use crate::error::Error;
use crate::mutation::MutationCoordinator;
use crate::storage::{EntityStore, StorageConfig};

/// An open EnrollDB instance.
///
/// Bundles the immutable academic catalog with an entity store and hands
/// out the coordinator and resolver that borrow both.
pub struct Database {
    catalog: Catalog,
    store: EntityStore,
}

impl Database {
    /// Open or create a database with the given storage configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        let store = EntityStore::open(config)?;
        let catalog = Catalog::school();
        info!("database opened");
        Ok(Self { catalog, store })
    }

    /// The relationship catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The underlying entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The write path.
    pub fn mutations(&self) -> MutationCoordinator<'_> {
        MutationCoordinator::new(&self.catalog, &self.store)
    }

    /// The read path for joined views.
    pub fn resolver(&self) -> ComposeResolver<'_> {
        ComposeResolver::new(&self.catalog, &self.store)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.store.flush()
    }
}
