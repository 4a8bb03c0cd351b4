use crate::cache::StableQueryCache;
use crate::compat::Rc;
use crate::history::Navigator;
use crate::history_with_query::HistoryWithQuery;
use crate::location::NavigationTarget;
use crate::options::QueryOptions;
use crate::query::Query;

/// The current query of a history plus functions that rewrite it.
///
/// Keep one `QueryParams` per consumer and call
/// [`query_params`](Self::query_params) on every re-evaluation: as long as
/// the search string and options are unchanged the same `Rc<Query>` comes
/// back.
///
/// ```
/// use std::rc::Rc;
/// use locq::{query, MemoryHistory, QueryOptions, QueryParams};
///
/// let history: MemoryHistory = MemoryHistory::with_entries(["/path?one=1&two=value"], 0)?;
/// let params = QueryParams::new(&history);
/// let options = QueryOptions { parse_numbers: true, ..QueryOptions::default() };
///
/// let (query, actions) = params.query_params(options);
/// assert_eq!(*query, query! { "one" => 1, "two" => "value" });
///
/// actions.push_query_with(|q| {
///     let mut next = q.clone();
///     next.insert("one", 2);
///     next
/// })?;
/// assert_eq!(*params.query(options), query! { "one" => 2, "two" => "value" });
/// # Ok::<(), locq::LocationError>(())
/// ```
#[derive(Debug)]
pub struct QueryParams<H> {
    history: H,
    cache: StableQueryCache,
}

impl<H: Navigator> QueryParams<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            cache: StableQueryCache::new(),
        }
    }

    /// The current query, reference-stable across calls while the search
    /// string and `options` are unchanged
    pub fn query(&self, options: QueryOptions) -> Rc<Query> {
        self.cache.get(&self.history.location().search, &options)
    }

    /// The current query and the update functions bound to `options`
    pub fn query_params(&self, options: QueryOptions) -> (Rc<Query>, QueryActions<'_, H>) {
        (self.query(options), QueryActions {
            params: self,
            options,
        })
    }

    pub fn get_ref(&self) -> &H {
        &self.history
    }
}

/// `push`/`replace` helpers that take a whole new query.
///
/// The new query replaces the current one; nothing is merged. To keep other
/// keys, start from the current query with the `*_with` variants. The query
/// is not validated, any mapping is serialized as-is.
#[derive(Debug)]
pub struct QueryActions<'a, H> {
    params: &'a QueryParams<H>,
    options: QueryOptions,
}

impl<H> Clone for QueryActions<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for QueryActions<'_, H> {}

impl<H: Navigator> QueryActions<'_, H> {
    /// Push a new entry whose query is `query`
    ///
    /// # Errors
    ///
    /// Whatever the underlying navigator's `push` returns.
    pub fn push_query(&self, query: Query) -> Result<(), H::Error> {
        self.navigator().push(NavigationTarget::query(query), None)
    }

    /// Replace the current entry's query with `query`
    ///
    /// # Errors
    ///
    /// Whatever the underlying navigator's `replace` returns.
    pub fn replace_query(&self, query: Query) -> Result<(), H::Error> {
        self.navigator().replace(NavigationTarget::query(query), None)
    }

    /// Push a new entry whose query is `update(current)`
    ///
    /// # Errors
    ///
    /// Whatever the underlying navigator's `push` returns.
    pub fn push_query_with<F>(&self, update: F) -> Result<(), H::Error>
    where
        F: FnOnce(&Query) -> Query,
    {
        let next = update(&self.current());
        self.push_query(next)
    }

    /// Replace the current entry's query with `update(current)`
    ///
    /// # Errors
    ///
    /// Whatever the underlying navigator's `replace` returns.
    pub fn replace_query_with<F>(&self, update: F) -> Result<(), H::Error>
    where
        F: FnOnce(&Query) -> Query,
    {
        let next = update(&self.current());
        self.replace_query(next)
    }

    /// Query of the location at call time, not at `query_params` time
    fn current(&self) -> Rc<Query> {
        self.params.query(self.options)
    }

    fn navigator(&self) -> HistoryWithQuery<&H> {
        HistoryWithQuery::new(&self.params.history, self.options)
    }
}
