use locq::{ArrayFormat, Query, QueryOptions, query};

fn main() {
    // Parse a search string
    let options = QueryOptions {
        parse_numbers: true,
        ..QueryOptions::default()
    };
    let q = Query::parse_with("?one=1&two=value&arr=A&arr=B&arr=C", &options);

    println!("one: {:?}", q.get("one")); // Some(Number(1.0))
    println!("two: {:?}", q.get("two")); // Some(String("value"))
    println!("arr: {:?}", q.get("arr")); // Some(Array([String("A"), String("B"), String("C")]))
    println!();

    // Stringify, keys are sorted
    let q = query! { "page" => 2, "tags" => ["rust", "web"], "q" => "a b" };
    println!("default: {}", q.stringify(&QueryOptions::default())); // page=2&q=a%20b&tags=rust&tags=web

    let bracket = QueryOptions {
        array_format: ArrayFormat::Bracket,
        ..QueryOptions::default()
    };
    println!("bracket: {}", q.stringify(&bracket)); // page=2&q=a%20b&tags[]=rust&tags[]=web
}
