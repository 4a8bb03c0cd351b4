use locq::{LocationError, LocationSource, MemoryHistory, QueryOptions, QueryParams, query};

fn main() -> Result<(), LocationError> {
    let history: MemoryHistory = MemoryHistory::with_entries(["/search?q=rust&page=1"], 0)?;
    history.listen(|location, action| println!("{action:?} {}", location.href()));

    let params = QueryParams::new(&history);
    let options = QueryOptions {
        parse_numbers: true,
        ..QueryOptions::default()
    };

    let (q, actions) = params.query_params(options);
    println!("Current query: {q}"); // page=1&q=rust

    // Move to the next page, keeping the other keys
    actions.push_query_with(|current| {
        let mut next = current.clone();
        let page = next
            .get("page")
            .and_then(locq::QueryValue::as_number)
            .unwrap_or(1.0);
        next.insert("page", page + 1.0);
        next
    })?; // Push /search?page=2&q=rust

    // Replace the whole query
    actions.replace_query(query! { "q" => "history" })?; // Replace /search?q=history

    // Clear it
    actions.replace_query(query! {})?; // Replace /search

    println!("Final location: {}", history.location().href()); // /search
    Ok(())
}
