#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

/// Query-aware history tests
///
/// This test suite covers:
/// - Pushing and replacing with a structured query
/// - Clearing the query with an empty mapping
/// - Literal path strings passing through untouched
/// - Error propagation from the wrapped navigator
use std::cell::RefCell;

use locq::{
    ArrayFormat, Location, LocationSource, MemoryHistory, NavigationTarget, Navigator,
    PartialLocation, Query, QueryOptions, history_with_query, query,
};
use tracing_test::traced_test;

const PATH: &str = "/path?one=1&two=value&arr=A&arr=B&arr=C";

fn history() -> MemoryHistory {
    MemoryHistory::with_entries([PATH], 0).unwrap()
}

#[test]
fn test_push_with_query() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());

    with_query
        .push(NavigationTarget::query(query! { "two" => "stuff" }), None)
        .unwrap();

    let location = with_query.location_with_query();
    assert_eq!(location.pathname, "/path");
    assert_eq!(location.search, "?two=stuff");
    assert_eq!(location.query, query! { "two" => "stuff" });
    assert_eq!(history.len(), 2);
}

#[test]
fn test_replace_with_query() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());

    with_query
        .replace(
            PartialLocation::new()
                .with_pathname("/other")
                .with_hash("#top")
                .with_query(query! { "b" => "2", "a" => "1" })
                .into(),
            None,
        )
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history.location().href(), "/other?a=1&b=2#top");
}

#[test]
fn test_empty_query_clears_search() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());

    with_query.push(Query::new().into(), None).unwrap();

    let location = with_query.location_with_query();
    assert_eq!(location.search, "");
    assert!(location.query.is_empty());
    assert_eq!(location.pathname, "/path");
}

#[test]
fn test_literal_path_passes_through() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());

    with_query.push("/path?two=stuff".into(), None).unwrap();

    let location = with_query.location_with_query();
    assert_eq!(location.search, "?two=stuff");
    assert_eq!(location.query, query! { "two" => "stuff" });
}

#[test]
fn test_query_overrides_literal_search() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());

    with_query
        .push(
            PartialLocation::new()
                .with_search("?ignored=1")
                .with_query(query! { "kept" => "yes" })
                .into(),
            None,
        )
        .unwrap();
    assert_eq!(history.location().search, "?kept=yes");
}

#[test]
fn test_options_shape_serialization() {
    let history = history();
    let options = QueryOptions {
        array_format: ArrayFormat::Comma,
        parse_numbers: true,
        ..QueryOptions::default()
    };
    let with_query = history_with_query(&history, options);

    with_query
        .push(NavigationTarget::query(query! { "ids" => [1, 2, 3] }), None)
        .unwrap();

    assert_eq!(history.location().search, "?ids=1,2,3");
    assert_eq!(
        with_query.location_with_query().query,
        query! { "ids" => [1, 2, 3] }
    );
}

#[test]
fn test_state_is_forwarded() {
    let history: MemoryHistory<u8> = MemoryHistory::new();
    let with_query = history_with_query(&history, QueryOptions::default());
    with_query
        .push(NavigationTarget::query(query! { "a" => "b" }), Some(7))
        .unwrap();
    assert_eq!(history.location().state, Some(7));
}

#[derive(Debug, PartialEq)]
struct Refused;

/// A navigator that records what it was asked to do and refuses it
#[derive(Default)]
struct ReadOnly {
    seen: RefCell<Vec<NavigationTarget>>,
}

impl LocationSource for ReadOnly {
    type State = ();

    fn location(&self) -> Location {
        Location::from_path(PATH)
    }
}

impl Navigator for ReadOnly {
    type Error = Refused;

    fn push(&self, target: NavigationTarget, _state: Option<()>) -> Result<(), Refused> {
        self.seen.borrow_mut().push(target);
        Err(Refused)
    }

    fn replace(&self, target: NavigationTarget, _state: Option<()>) -> Result<(), Refused> {
        self.seen.borrow_mut().push(target);
        Err(Refused)
    }
}

#[test]
fn test_errors_propagate_unchanged() {
    let navigator = ReadOnly::default();
    let with_query = history_with_query(&navigator, QueryOptions::default());

    assert_eq!(
        with_query.push(NavigationTarget::query(query! { "a" => "1" }), None),
        Err(Refused)
    );
    assert_eq!(with_query.replace("/x".into(), None), Err(Refused));

    let seen = navigator.seen.borrow();
    assert_eq!(
        *seen,
        [
            NavigationTarget::Location(PartialLocation::new().with_search("?a=1")),
            NavigationTarget::from("/x"),
        ]
    );
}

#[test]
#[traced_test]
fn test_serialization_is_logged() {
    let history = history();
    let with_query = history_with_query(&history, QueryOptions::default());
    with_query
        .push(NavigationTarget::query(query! { "two" => "stuff" }), None)
        .unwrap();

    assert!(logs_contain("serialized query into navigation target"));
    assert!(logs_contain("history transition"));
}
