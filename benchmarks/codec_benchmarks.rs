#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

/// Codec benchmarks: locq vs `url::form_urlencoded`
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use locq::codec::{parse, stringify};
use locq::{ArrayFormat, Query, QueryOptions, StableQueryCache};

const SIMPLE: &str = "?one=1&two=value";
const COMPLEX: &str = "?q=caf%C3%A9%20au%20lait&page=12&sort=desc&tag=a&tag=b&tag=c\
&filter%5Bprice%5D=10-20&empty=&flag&redirect=%2Fhome%3Fx%3D1";

fn numbers() -> QueryOptions {
    QueryOptions {
        parse_numbers: true,
        ..QueryOptions::default()
    }
}

fn bench_parse_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_simple");
    let options = QueryOptions::default();

    group.bench_function("locq", |b| {
        b.iter(|| parse(black_box(SIMPLE), &options));
    });

    group.bench_function("form_urlencoded", |b| {
        b.iter(|| {
            url::form_urlencoded::parse(black_box(&SIMPLE.as_bytes()[1..]))
                .into_owned()
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

fn bench_parse_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_complex");
    let options = numbers();

    group.bench_function("locq", |b| {
        b.iter(|| parse(black_box(COMPLEX), &options));
    });

    group.bench_function("form_urlencoded", |b| {
        b.iter(|| {
            url::form_urlencoded::parse(black_box(&COMPLEX.as_bytes()[1..]))
                .into_owned()
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

fn bench_parse_array_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_array_formats");
    let inputs = [
        (ArrayFormat::None, "a=1&a=2&a=3&a=4"),
        (ArrayFormat::Bracket, "a[]=1&a[]=2&a[]=3&a[]=4"),
        (ArrayFormat::Index, "a[3]=4&a[1]=2&a[0]=1&a[2]=3"),
        (ArrayFormat::Comma, "a=1,2,3,4"),
    ];

    for (array_format, input) in inputs {
        let options = QueryOptions {
            array_format,
            ..numbers()
        };
        group.bench_function(format!("{array_format:?}"), |b| {
            b.iter(|| parse(black_box(input), &options));
        });
    }

    group.finish();
}

fn bench_stringify(c: &mut Criterion) {
    let mut group = c.benchmark_group("stringify");
    let options = numbers();
    let query = parse(COMPLEX, &options);
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&COMPLEX.as_bytes()[1..])
        .into_owned()
        .collect();

    group.bench_function("locq", |b| {
        b.iter(|| stringify(black_box(&query), &options));
    });

    group.bench_function("form_urlencoded", |b| {
        b.iter(|| {
            url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(black_box(&pairs))
                .finish()
        });
    });

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let options = numbers();

    group.bench_function("hit", |b| {
        let cache = StableQueryCache::new();
        cache.get(COMPLEX, &options);
        b.iter(|| cache.get(black_box(COMPLEX), &options));
    });

    group.bench_function("miss", |b| {
        let cache = StableQueryCache::new();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let search = if flip { COMPLEX } else { SIMPLE };
            cache.get(black_box(search), &options)
        });
    });

    group.bench_function("uncached", |b| {
        b.iter(|| Query::parse_with(black_box(COMPLEX), &options));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_complex,
    bench_parse_array_formats,
    bench_stringify,
    bench_cache
);

criterion_main!(benches);
