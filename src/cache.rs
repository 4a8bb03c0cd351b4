use crate::codec;
use crate::compat::{Rc, String};
use crate::options::QueryOptions;
use crate::query::Query;
use core::cell::RefCell;

struct CacheEntry {
    search: String,
    options: QueryOptions,
    query: Rc<Query>,
}

/// Single-slot cache of the last parsed query.
///
/// While the raw search string and the options are unchanged (compared by
/// value), [`get`](Self::get) hands out the same `Rc`, so callers can use
/// [`Rc::ptr_eq`] to skip work downstream. Any change re-parses and
/// replaces the entry; only the most recent entry is kept.
///
/// ```
/// use std::rc::Rc;
/// use locq::{QueryOptions, StableQueryCache};
///
/// let cache = StableQueryCache::new();
/// let a = cache.get("?x=1", &QueryOptions::default());
/// let b = cache.get("?x=1", &QueryOptions::default());
/// assert!(Rc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct StableQueryCache {
    entry: RefCell<Option<CacheEntry>>,
}

impl StableQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsed query for `search`, reusing the cached one on a hit
    pub fn get(&self, search: &str, options: &QueryOptions) -> Rc<Query> {
        {
            let entry = self.entry.borrow();
            let hit = entry
                .as_ref()
                .filter(|entry| entry.search == search && entry.options == *options);
            if let Some(entry) = hit {
                tracing::trace!(search, "query cache hit");
                return Rc::clone(&entry.query);
            }
        }

        tracing::debug!(search, "query cache miss");
        let query = Rc::new(codec::parse(search, options));
        *self.entry.borrow_mut() = Some(CacheEntry {
            search: String::from(search),
            options: *options,
            query: Rc::clone(&query),
        });
        query
    }

    /// Drop the cached entry
    pub fn clear(&self) {
        self.entry.borrow_mut().take();
    }
}

impl core::fmt::Debug for StableQueryCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let entry = self.entry.borrow();
        f.debug_struct("StableQueryCache")
            .field("search", &entry.as_ref().map(|e| e.search.as_str()))
            .finish_non_exhaustive()
    }
}
