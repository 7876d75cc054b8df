use crate::error::StoreError;
use crate::model::CatalogEntry;
use std::sync::RwLock;

/// Abstract catalog persistence. Implementations may be backed by anything
/// (relational, document, in-memory); the engine only relies on these
/// operations and on at-least read-committed visibility of recent writes
/// within a process.
///
/// Listing order is the store's enumeration order and governs exact/fuzzy
/// tie-breaking; [`InMemoryCatalogStore`] preserves insertion order so ties
/// resolve deterministically to the first-inserted entry.
pub trait CatalogStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError>;

    fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError>;

    fn find_first_by_category_ignore_case(
        &self,
        category: &str,
    ) -> Result<Option<CatalogEntry>, StoreError>;

    /// Insert or update an entry. Entries without an id get one assigned;
    /// entries with an id replace the stored entry with the same id.
    fn save(&self, entry: CatalogEntry) -> Result<CatalogEntry, StoreError>;

    /// All known carbon impact values, ascending.
    fn carbon_impacts_ordered(&self) -> Result<Vec<f64>, StoreError>;
}

struct Inner {
    entries: Vec<CatalogEntry>,
    next_id: u64,
}

/// Insertion-ordered in-memory store, the reference implementation.
pub struct InMemoryCatalogStore {
    inner: RwLock<Inner>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        InMemoryCatalogStore {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Build a store pre-seeded with the given entries, assigning ids in
    /// order.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        let store = InMemoryCatalogStore::new();
        for entry in entries {
            // Seeding cannot fail on the in-memory store.
            let _ = store.save(entry);
        }
        store
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError("catalog lock poisoned".into()))
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        InMemoryCatalogStore::new()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.read()?.entries.clone())
    }

    fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self
            .read()?
            .entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn find_first_by_category_ignore_case(
        &self,
        category: &str,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self
            .read()?
            .entries
            .iter()
            .find(|e| e.category.eq_ignore_ascii_case(category))
            .cloned())
    }

    fn save(&self, mut entry: CatalogEntry) -> Result<CatalogEntry, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError("catalog lock poisoned".into()))?;
        match entry.id {
            Some(id) => {
                if let Some(existing) = inner.entries.iter_mut().find(|e| e.id == Some(id)) {
                    *existing = entry.clone();
                } else {
                    inner.entries.push(entry.clone());
                }
            }
            None => {
                entry.id = Some(inner.next_id);
                inner.next_id += 1;
                inner.entries.push(entry.clone());
            }
        }
        Ok(entry)
    }

    fn carbon_impacts_ordered(&self) -> Result<Vec<f64>, StoreError> {
        let mut impacts: Vec<f64> = self
            .read()?
            .entries
            .iter()
            .filter_map(|e| e.carbon_impact_gram)
            .filter(|v| v.is_finite())
            .collect();
        impacts.sort_by(f64::total_cmp);
        Ok(impacts)
    }
}

/// Primary/secondary composition: every operation tries the primary store
/// and fails over to the secondary on error, logging the failure. This keeps
/// fallback wiring out of the engine's call sites.
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: CatalogStore, S: CatalogStore> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        FallbackStore { primary, secondary }
    }

    fn failover<T>(
        &self,
        operation: &str,
        primary: Result<T, StoreError>,
        secondary: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match primary {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    operation,
                    error = %err,
                    "primary catalog store failed; falling back to secondary"
                );
                secondary()
            }
        }
    }
}

impl<P: CatalogStore, S: CatalogStore> CatalogStore for FallbackStore<P, S> {
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.failover("list_all", self.primary.list_all(), || {
            self.secondary.list_all()
        })
    }

    fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        self.failover(
            "find_by_name_ignore_case",
            self.primary.find_by_name_ignore_case(name),
            || self.secondary.find_by_name_ignore_case(name),
        )
    }

    fn find_first_by_category_ignore_case(
        &self,
        category: &str,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        self.failover(
            "find_first_by_category_ignore_case",
            self.primary.find_first_by_category_ignore_case(category),
            || self.secondary.find_first_by_category_ignore_case(category),
        )
    }

    fn save(&self, entry: CatalogEntry) -> Result<CatalogEntry, StoreError> {
        self.failover("save", self.primary.save(entry.clone()), || {
            self.secondary.save(entry)
        })
    }

    fn carbon_impacts_ordered(&self) -> Result<Vec<f64>, StoreError> {
        self.failover(
            "carbon_impacts_ordered",
            self.primary.carbon_impacts_ordered(),
            || self.secondary.carbon_impacts_ordered(),
        )
    }
}
