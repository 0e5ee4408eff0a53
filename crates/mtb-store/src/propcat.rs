//! Versioned property catalog resolution.
//!
//! The source system keeps historical code lists under increasing version
//! numbers; the same code may carry different display text in different
//! versions. Entries are loaded lazily on first reference and cached for the
//! lifetime of the catalog, which is built once at startup and shared by
//! reference across aggregation requests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::error::CatalogError;

/// Canonical display data for one `(code, version)` pair. Immutable once
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: String,
    pub short_desc: String,
    /// Label of the code-list revision the entry belongs to, e.g. `"2025"`.
    pub version_label: Option<String>,
}

/// Backing loader for catalog entries, implemented by the store layer.
pub trait CatalogSource: Send + Sync {
    fn load(&self, code: &str, version: i32) -> Option<CatalogEntry>;
}

/// Cache-fronted catalog resolver.
///
/// Concurrent first accesses for the same pair may both hit the source; the
/// first inserted entry wins and every caller sees the same shared entry
/// afterwards.
pub struct PropertyCatalog {
    source: Box<dyn CatalogSource>,
    cache: RwLock<HashMap<(String, i32), Arc<CatalogEntry>>>,
}

impl PropertyCatalog {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the entry valid for exactly this `(code, version)` pair.
    ///
    /// A missing pair is fatal for the field requiring the display text.
    pub fn resolve(&self, code: &str, version: i32) -> Result<Arc<CatalogEntry>, CatalogError> {
        let key = (code.to_string(), version);

        if let Some(entry) = self.cache.read().expect("catalog cache lock").get(&key) {
            return Ok(Arc::clone(entry));
        }

        let loaded = self
            .source
            .load(code, version)
            .ok_or_else(|| CatalogError::MissingEntry {
                code: code.to_string(),
                version,
            })?;

        let mut cache = self.cache.write().expect("catalog cache lock");
        let entry = cache.entry(key).or_insert_with(|| Arc::new(loaded));
        Ok(Arc::clone(entry))
    }

    /// Display text for callers that tolerate a missing entry: degrades to
    /// an empty string with a warning instead of failing.
    pub fn short_desc_or_empty(&self, code: &str, version: i32) -> String {
        match self.resolve(code, version) {
            Ok(entry) => entry.short_desc.clone(),
            Err(_) => {
                warn!(code, version, "no catalog entry, returning empty display");
                String::new()
            }
        }
    }
}

/// Map-backed catalog source for tests and small fixed code lists.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: HashMap<(String, i32), CatalogEntry>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, version: i32, short_desc: &str, version_label: &str) {
        self.entries.insert(
            (code.to_string(), version),
            CatalogEntry {
                code: code.to_string(),
                short_desc: short_desc.to_string(),
                version_label: Some(version_label.to_string()),
            },
        );
    }
}

impl CatalogSource for MemoryCatalog {
    fn load(&self, code: &str, version: i32) -> Option<CatalogEntry> {
        self.entries.get(&(code.to_string(), version)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl CatalogSource for CountingSource {
        fn load(&self, code: &str, version: i32) -> Option<CatalogEntry> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            (code == "C34.1" && version == 2).then(|| CatalogEntry {
                code: code.to_string(),
                short_desc: "Upper lobe, bronchus or lung".to_string(),
                version_label: Some("2025".to_string()),
            })
        }
    }

    #[test]
    fn resolve_caches_and_returns_the_same_entry() {
        let loads = Arc::new(AtomicUsize::new(0));
        let catalog = PropertyCatalog::new(CountingSource {
            loads: Arc::clone(&loads),
        });

        let first = catalog.resolve("C34.1", 2).unwrap();
        let second = catalog.resolve("C34.1", 2).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(first.short_desc, "Upper lobe, bronchus or lung");
    }

    #[test]
    fn missing_pair_is_fatal() {
        let catalog = PropertyCatalog::new(MemoryCatalog::new());
        assert_eq!(
            catalog.resolve("C34.1", 1),
            Err(CatalogError::MissingEntry {
                code: "C34.1".to_string(),
                version: 1,
            })
        );
    }

    #[test]
    fn distinct_versions_resolve_independently() {
        let mut source = MemoryCatalog::new();
        source.insert("G2", 1, "moderately differentiated", "v1");
        source.insert("G2", 2, "Moderately differentiated", "2025");
        let catalog = PropertyCatalog::new(source);

        assert_eq!(
            catalog.resolve("G2", 1).unwrap().short_desc,
            "moderately differentiated"
        );
        assert_eq!(
            catalog.resolve("G2", 2).unwrap().short_desc,
            "Moderately differentiated"
        );
    }

    #[test]
    fn short_desc_or_empty_degrades() {
        let catalog = PropertyCatalog::new(MemoryCatalog::new());
        assert_eq!(catalog.short_desc_or_empty("X", 1), "");
    }
}
