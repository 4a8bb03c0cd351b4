use crate::codec;
use crate::history::LocationSource;
use crate::location::Location;
use crate::options::QueryOptions;
use crate::query::Query;

/// A [`Location`] together with its parsed `search`.
///
/// Dereferences to the location, so `pathname`, `search` and friends read
/// as if `query` were just another field.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationWithQuery<S = ()> {
    pub location: Location<S>,
    pub query: Query,
}

impl<S> LocationWithQuery<S> {
    pub fn into_location(self) -> Location<S> {
        self.location
    }
}

impl<S> core::ops::Deref for LocationWithQuery<S> {
    type Target = Location<S>;

    fn deref(&self) -> &Self::Target {
        &self.location
    }
}

/// Attach the parsed query to `location`. Never fails: malformed query
/// strings still produce a mapping.
pub fn with_parsed_query<S>(location: Location<S>, options: &QueryOptions) -> LocationWithQuery<S> {
    let query = codec::parse(&location.search, options);
    LocationWithQuery { location, query }
}

/// The current location of `source`, with its query parsed.
///
/// ```
/// use locq::{location_with_query, MemoryHistory, QueryOptions, QueryValue};
///
/// let history: MemoryHistory = MemoryHistory::with_entries(["/path?one=1&two=value"], 0)?;
/// let options = QueryOptions { parse_numbers: true, ..QueryOptions::default() };
/// let location = location_with_query(&history, &options);
///
/// assert_eq!(location.pathname, "/path");
/// assert_eq!(location.query.get("one"), Some(&QueryValue::Number(1.0)));
/// # Ok::<(), locq::LocationError>(())
/// ```
pub fn location_with_query<L: LocationSource + ?Sized>(
    source: &L,
    options: &QueryOptions,
) -> LocationWithQuery<L::State> {
    with_parsed_query(source.location(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;

    #[test]
    fn test_with_parsed_query() {
        let location: Location = Location::from_path("/path?one=1&two=value&arr=A&arr=B&arr=C");
        let with_query = with_parsed_query(location.clone(), &QueryOptions::default());
        assert_eq!(with_query.location, location);
        assert_eq!(
            with_query.query,
            query! { "one" => "1", "two" => "value", "arr" => ["A", "B", "C"] }
        );
    }

    #[test]
    fn test_empty_search() {
        let location: Location = Location::from_path("/path");
        let with_query = with_parsed_query(location, &QueryOptions::default());
        assert!(with_query.query.is_empty());
        assert_eq!(with_query.search, "");
    }
}
