use crate::compat::{String, ToString};
use crate::error::Result;
use crate::helpers::{prune_fragment, prune_search, resolve_pathname};
use crate::percent_encode::decode_pathname;
use crate::query::Query;

/// A history entry: where the application is, as reported by a router.
///
/// `search` is either empty or starts with `?`; `hash` is either empty or
/// starts with `#`. The parsed query is never stored here, see
/// [`LocationWithQuery`](crate::LocationWithQuery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<S = ()> {
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub state: Option<S>,
    pub key: Option<String>,
}

impl<S> Default for Location<S> {
    fn default() -> Self {
        Self {
            pathname: String::from("/"),
            search: String::new(),
            hash: String::new(),
            state: None,
            key: None,
        }
    }
}

impl<S> Location<S> {
    /// Split a path like `/path?a=1#top` into its components.
    ///
    /// No decoding or resolution happens here.
    ///
    /// ```
    /// use locq::Location;
    ///
    /// let location: Location = Location::from_path("/path?a=1#top");
    /// assert_eq!(location.pathname, "/path");
    /// assert_eq!(location.search, "?a=1");
    /// assert_eq!(location.hash, "#top");
    /// ```
    pub fn from_path(path: &str) -> Self {
        let partial = PartialLocation::from_path(path);
        Self {
            pathname: partial.pathname.unwrap_or_default(),
            search: partial.search.map(|s| prefixed('?', &s)).unwrap_or_default(),
            hash: partial.hash.map(|h| prefixed('#', &h)).unwrap_or_default(),
            state: None,
            key: None,
        }
    }

    /// `pathname + search + hash`, skipping a bare `?` or `#`
    pub fn href(&self) -> String {
        let mut path = self.pathname.clone();
        push_component(&mut path, '?', &self.search);
        push_component(&mut path, '#', &self.hash);
        path
    }

    /// Resolve a navigation target against `current`, the way a history
    /// collaborator turns `push`/`replace` arguments into a new entry.
    ///
    /// * a missing pathname keeps `current`'s pathname
    /// * a relative pathname is resolved against `current`'s pathname
    /// * `search`/`hash` gain their `?`/`#` prefix when missing
    /// * the pathname is percent-decoded, except escapes of reserved
    ///   characters such as `%3F` and `%2F`, which stay encoded
    ///
    /// A structured target's `query` is ignored; only `search` is read.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidPercentEncoding`](crate::LocationError::InvalidPercentEncoding)
    /// when the pathname does not decode to UTF-8.
    pub fn resolve(
        target: &NavigationTarget,
        state: Option<S>,
        key: Option<String>,
        current: Option<&Location<S>>,
    ) -> Result<Self> {
        let parsed;
        let partial = match target {
            NavigationTarget::Path(path) => {
                parsed = PartialLocation::from_path(path);
                &parsed
            }
            NavigationTarget::Location(partial) => partial,
        };

        let pathname = match (partial.pathname.as_deref(), current) {
            (None | Some(""), Some(current)) => current.pathname.clone(),
            (None | Some(""), None) => String::from("/"),
            (Some(pathname), Some(current)) if !pathname.starts_with('/') => {
                resolve_pathname(pathname, &current.pathname)
            }
            (Some(pathname), _) => pathname.to_string(),
        };

        Ok(Self {
            pathname: decode_pathname(&pathname)?,
            search: partial
                .search
                .as_deref()
                .map(|s| prefixed('?', s))
                .unwrap_or_default(),
            hash: partial
                .hash
                .as_deref()
                .map(|h| prefixed('#', h))
                .unwrap_or_default(),
            state,
            key,
        })
    }
}

impl<S> core::fmt::Display for Location<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.href())
    }
}

/// Prefix `value` with `marker` unless it is empty or already prefixed
fn prefixed(marker: char, value: &str) -> String {
    if value.is_empty() || value.starts_with(marker) {
        value.to_string()
    } else {
        let mut out = String::with_capacity(value.len() + 1);
        out.push(marker);
        out.push_str(value);
        out
    }
}

fn push_component(path: &mut String, marker: char, value: &str) {
    if value.is_empty() || (value.len() == marker.len_utf8() && value.starts_with(marker)) {
        return;
    }
    if !value.starts_with(marker) {
        path.push(marker);
    }
    path.push_str(value);
}

/// The structured form of a navigation target.
///
/// Every field is optional. When `query` is set, query-aware navigators
/// serialize it into `search`, overriding any literal `search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialLocation {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
    pub query: Option<Query>,
}

impl PartialLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a path string; the returned search and hash have no prefix
    pub fn from_path(path: &str) -> Self {
        let (rest, hash) = prune_fragment(path);
        let (pathname, search) = prune_search(rest);
        Self {
            pathname: (!pathname.is_empty()).then(|| pathname.to_string()),
            search: search.filter(|s| !s.is_empty()).map(ToString::to_string),
            hash: hash.filter(|h| !h.is_empty()).map(ToString::to_string),
            query: None,
        }
    }

    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }
}

/// Argument of [`Navigator::push`](crate::Navigator::push) and
/// [`Navigator::replace`](crate::Navigator::replace).
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationTarget {
    /// A path, optionally with its own `?query` and `#hash`
    Path(String),
    Location(PartialLocation),
}

impl NavigationTarget {
    /// Target that keeps the current pathname and sets only the query
    pub fn query(query: Query) -> Self {
        Self::Location(PartialLocation::new().with_query(query))
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<PartialLocation> for NavigationTarget {
    fn from(partial: PartialLocation) -> Self {
        Self::Location(partial)
    }
}

impl From<Query> for NavigationTarget {
    fn from(query: Query) -> Self {
        Self::query(query)
    }
}
