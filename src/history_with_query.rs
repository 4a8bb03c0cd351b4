use crate::codec;
use crate::compat::String;
use crate::history::{LocationSource, Navigator};
use crate::location::{Location, NavigationTarget};
use crate::location_with_query::{LocationWithQuery, with_parsed_query};
use crate::options::QueryOptions;

/// Serialize a structured target's `query` into its `search`.
///
/// A target carrying `Some(query)` gets `search = "?" + stringify(query)`,
/// or an empty `search` when nothing is serialized, so `Some(Query::new())`
/// clears the query. The `query` field itself is dropped. Path strings and
/// targets without a query are returned unchanged.
pub fn serialize_query_target(target: NavigationTarget, options: &QueryOptions) -> NavigationTarget {
    match target {
        NavigationTarget::Location(mut partial) => {
            if let Some(query) = partial.query.take() {
                let serialized = codec::stringify(&query, options);
                let search = if serialized.is_empty() {
                    String::new()
                } else {
                    let mut search = String::with_capacity(serialized.len() + 1);
                    search.push('?');
                    search.push_str(&serialized);
                    search
                };
                tracing::debug!(%search, "serialized query into navigation target");
                partial.search = Some(search);
            }
            NavigationTarget::Location(partial)
        }
        path @ NavigationTarget::Path(_) => path,
    }
}

/// A navigator whose `push`/`replace` accept targets carrying a `query`.
///
/// ```
/// use locq::{history_with_query, query, MemoryHistory, NavigationTarget, Navigator, QueryOptions};
///
/// let history: MemoryHistory = MemoryHistory::with_entries(["/path?one=1"], 0)?;
/// let with_query = history_with_query(&history, QueryOptions::default());
///
/// with_query.push(NavigationTarget::query(query! { "two" => "stuff" }), None)?;
/// assert_eq!(with_query.location_with_query().search, "?two=stuff");
/// # Ok::<(), locq::LocationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HistoryWithQuery<H> {
    history: H,
    options: QueryOptions,
}

/// Wrap `history` so navigation targets may carry a `query`
pub fn history_with_query<H: Navigator>(history: H, options: QueryOptions) -> HistoryWithQuery<H> {
    HistoryWithQuery::new(history, options)
}

impl<H: Navigator> HistoryWithQuery<H> {
    pub fn new(history: H, options: QueryOptions) -> Self {
        Self { history, options }
    }

    /// The current location with its query parsed
    pub fn location_with_query(&self) -> LocationWithQuery<H::State> {
        with_parsed_query(self.history.location(), &self.options)
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// The wrapped navigator, for operations this wrapper does not cover
    pub fn get_ref(&self) -> &H {
        &self.history
    }

    pub fn into_inner(self) -> H {
        self.history
    }
}

impl<H: Navigator> LocationSource for HistoryWithQuery<H> {
    type State = H::State;

    fn location(&self) -> Location<Self::State> {
        self.history.location()
    }
}

impl<H: Navigator> Navigator for HistoryWithQuery<H> {
    type Error = H::Error;

    fn push(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error> {
        self.history
            .push(serialize_query_target(target, &self.options), state)
    }

    fn replace(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error> {
        self.history
            .replace(serialize_query_target(target, &self.options), state)
    }
}
