//! Query-string parsing and serialization.
//!
//! [`parse`] never fails: malformed percent sequences are kept literally and
//! undecodable bytes are replaced, so any input produces some [`Query`].
//! [`stringify`] writes no leading `?`; an empty query produces `""`.

use crate::compat::{Cow, String, ToString, Vec};
use crate::options::{ArrayFormat, QueryOptions};
use crate::percent_encode::{decode_component, encode_component_into};
use crate::query::{Query, QueryValue};
use core::fmt::Write;

/// Parse a search string (with or without leading `?`) into a [`Query`].
pub fn parse(input: &str, options: &QueryOptions) -> Query {
    let input = input.trim();
    let input = input
        .strip_prefix(|c: char| matches!(c, '?' | '#' | '&'))
        .unwrap_or(input);

    let mut acc = Accumulator::default();
    if input.is_empty() {
        return acc.finish(options);
    }

    for param in input.split('&').filter(|param| !param.is_empty()) {
        let param: Cow<'_, str> = if options.decode && param.contains('+') {
            Cow::Owned(param.replace('+', " "))
        } else {
            Cow::Borrowed(param)
        };
        let (key, value) = match param.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (&*param, None),
        };
        let key = decode(key, options);
        acc.add(key.into_owned(), value, options);
    }

    acc.finish(options)
}

/// Serialize a [`Query`] into a search string without leading `?`.
pub fn stringify(query: &Query, options: &QueryOptions) -> String {
    let mut entries: Vec<(&str, &QueryValue)> = query
        .iter()
        .filter(|(_, value)| !should_skip(value, options))
        .collect();
    if options.sort {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }

    let mut writer = Writer {
        out: String::new(),
        options,
    };
    for (key, value) in entries {
        match value {
            QueryValue::Null => {
                writer.begin();
                writer.encoded(key);
            }
            QueryValue::Array(items) => writer.array(key, items),
            scalar => {
                writer.begin();
                writer.encoded(key);
                writer.out.push('=');
                writer.scalar(scalar);
            }
        }
    }
    writer.out
}

fn decode<'a>(input: &'a str, options: &QueryOptions) -> Cow<'a, str> {
    if options.decode {
        decode_component(input)
    } else {
        Cow::Borrowed(input)
    }
}

fn should_skip(value: &QueryValue, options: &QueryOptions) -> bool {
    match value {
        QueryValue::Null => options.skip_null,
        QueryValue::String(s) => options.skip_empty_string && s.is_empty(),
        _ => false,
    }
}

/// Strip a trailing `[]` from a key
fn strip_brackets(key: &str) -> Option<&str> {
    key.strip_suffix("[]")
}

/// Split `key[12]` into `("key", "12")`; the index may be empty
fn split_index(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let open = memchr::memrchr(b'[', inner.as_bytes())?;
    let index = &inner[open + 1..];
    index
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some((&inner[..open], index))
}

/// Coerce a decoded string according to `parse_numbers` / `parse_booleans`
fn coerce(value: QueryValue, options: &QueryOptions) -> QueryValue {
    match value {
        QueryValue::String(s) => {
            let number = if options.parse_numbers {
                parse_number(&s)
            } else {
                None
            };
            if let Some(n) = number {
                return QueryValue::Number(n);
            }
            if options.parse_booleans {
                if s.eq_ignore_ascii_case("true") {
                    return QueryValue::Bool(true);
                }
                if s.eq_ignore_ascii_case("false") {
                    return QueryValue::Bool(false);
                }
            }
            QueryValue::String(s)
        }
        QueryValue::Array(items) => {
            QueryValue::Array(items.into_iter().map(|v| coerce(v, options)).collect())
        }
        other => other,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return Some(n);
    }
    // f64::from_str also accepts "inf" and "NaN", which are not numbers here
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Unsigned `0x`/`0o`/`0b` literals, as JavaScript's `Number()` reads them
fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &s[2..];
    // from_str_radix would also take a leading sign
    if !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    u128::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

enum Slot {
    Value(QueryValue),
    /// `key[n]` entries, ordered by index on finish
    Indexed(Vec<(String, QueryValue)>),
}

#[derive(Default)]
struct Accumulator {
    entries: Vec<(String, Slot)>,
}

impl Accumulator {
    fn slot_mut(&mut self, key: &str) -> Option<&mut Slot> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, slot)| slot)
    }

    fn set(&mut self, key: String, slot: Slot) {
        match self.slot_mut(&key) {
            Some(existing) => *existing = slot,
            None => self.entries.push((key, slot)),
        }
    }

    /// Concatenate `items` onto whatever is stored under `key`
    fn concat(&mut self, key: String, items: Vec<QueryValue>, always_array: bool) {
        match self.slot_mut(&key) {
            Some(Slot::Value(QueryValue::Array(existing))) => existing.extend(items),
            Some(slot) => {
                let previous = match core::mem::replace(slot, Slot::Value(QueryValue::Null)) {
                    Slot::Value(value) => value,
                    Slot::Indexed(indexed) => finish_indexed(indexed),
                };
                let mut merged = Vec::with_capacity(items.len() + 1);
                merged.push(previous);
                merged.extend(items);
                *slot = Slot::Value(QueryValue::Array(merged));
            }
            None => {
                let value = if !always_array && items.len() == 1 {
                    items.into_iter().next().unwrap_or(QueryValue::Null)
                } else {
                    QueryValue::Array(items)
                };
                self.entries.push((key, Slot::Value(value)));
            }
        }
    }

    fn set_indexed(&mut self, key: String, index: &str, value: QueryValue) {
        match self.slot_mut(&key) {
            Some(Slot::Indexed(indexed)) => {
                match indexed.iter_mut().find(|(i, _)| i.as_str() == index) {
                    Some((_, existing)) => *existing = value,
                    None => indexed.push((index.to_string(), value)),
                }
            }
            Some(slot) => *slot = Slot::Indexed(Vec::from([(index.to_string(), value)])),
            None => self.entries.push((
                key,
                Slot::Indexed(Vec::from([(index.to_string(), value)])),
            )),
        }
    }

    fn add(&mut self, key: String, raw_value: Option<&str>, options: &QueryOptions) {
        let format = options.array_format;
        if format.is_joined() {
            self.add_joined(key, raw_value, options);
            return;
        }

        let value = raw_value.map_or(QueryValue::Null, |v| {
            QueryValue::String(decode(v, options).into_owned())
        });

        match format {
            ArrayFormat::Bracket => match strip_brackets(&key).map(ToString::to_string) {
                Some(name) => self.concat(name, Vec::from([value]), true),
                None => self.set(key, Slot::Value(value)),
            },
            ArrayFormat::Index => {
                let indexed = split_index(&key)
                    .map(|(name, index)| (name.to_string(), index.to_string()));
                match indexed {
                    Some((name, index)) => self.set_indexed(name, &index, value),
                    None => self.set(key, Slot::Value(value)),
                }
            }
            _ => self.concat(key, Vec::from([value]), false),
        }
    }

    fn add_joined(&mut self, key: String, raw_value: Option<&str>, options: &QueryOptions) {
        let separator = options.separator();
        let split = |value: &str| -> Vec<QueryValue> {
            value
                .split(separator)
                .map(|item| QueryValue::String(decode(item, options).into_owned()))
                .collect()
        };

        if options.array_format == ArrayFormat::BracketSeparator {
            match strip_brackets(&key).map(ToString::to_string) {
                Some(name) => {
                    let items = raw_value.map_or_else(Vec::new, split);
                    self.concat(name, items, true);
                }
                None => {
                    let value = raw_value.map_or(QueryValue::Null, |v| {
                        QueryValue::String(decode(v, options).into_owned())
                    });
                    self.set(key, Slot::Value(value));
                }
            }
            return;
        }

        let Some(raw) = raw_value else {
            self.set(key, Slot::Value(QueryValue::Null));
            return;
        };
        let value = if raw.contains(separator) {
            QueryValue::Array(split(raw))
        } else {
            let decoded = decode(raw, options);
            if decoded.contains(separator) {
                QueryValue::Array(split(&*decoded))
            } else {
                QueryValue::String(decoded.into_owned())
            }
        };
        self.set(key, Slot::Value(value));
    }

    fn finish(self, options: &QueryOptions) -> Query {
        let mut query: Query = self
            .entries
            .into_iter()
            .map(|(key, slot)| {
                let value = match slot {
                    Slot::Value(value) => value,
                    Slot::Indexed(indexed) => finish_indexed(indexed),
                };
                (key, coerce(value, options))
            })
            .collect();
        if options.sort {
            query.sort();
        }
        query
    }
}

fn finish_indexed(mut indexed: Vec<(String, QueryValue)>) -> QueryValue {
    indexed.sort_by_key(|(index, _)| {
        if index.is_empty() {
            0
        } else {
            index.parse::<u64>().unwrap_or(u64::MAX)
        }
    });
    QueryValue::Array(indexed.into_iter().map(|(_, value)| value).collect())
}

struct Writer<'a> {
    out: String,
    options: &'a QueryOptions,
}

impl Writer<'_> {
    /// Start a new `key=value` segment
    fn begin(&mut self) {
        if !self.out.is_empty() {
            self.out.push('&');
        }
    }

    fn encoded(&mut self, input: &str) {
        if self.options.encode {
            encode_component_into(&mut self.out, input, self.options.strict);
        } else {
            self.out.push_str(input);
        }
    }

    fn scalar(&mut self, value: &QueryValue) {
        match value {
            QueryValue::String(s) => self.encoded(s),
            other => {
                let text = scalar_text(other);
                self.encoded(&text);
            }
        }
    }

    fn array(&mut self, key: &str, items: &[QueryValue]) {
        let options = self.options;
        let kept = items.iter().filter(|item| !should_skip(item, options));

        match options.array_format {
            ArrayFormat::None | ArrayFormat::Bracket => {
                let suffix = if options.array_format == ArrayFormat::Bracket {
                    "[]"
                } else {
                    ""
                };
                for item in kept {
                    self.begin();
                    self.encoded(key);
                    self.out.push_str(suffix);
                    if !item.is_null() {
                        self.out.push('=');
                        self.scalar(item);
                    }
                }
            }
            ArrayFormat::Index => {
                for (index, item) in kept.enumerate() {
                    self.begin();
                    self.encoded(key);
                    let _ = write!(self.out, "[{index}]");
                    if !item.is_null() {
                        self.out.push('=');
                        self.scalar(item);
                    }
                }
            }
            ArrayFormat::Comma | ArrayFormat::Separator | ArrayFormat::BracketSeparator => {
                let bracketed = options.array_format == ArrayFormat::BracketSeparator;
                if items.is_empty() {
                    if bracketed {
                        self.begin();
                        self.encoded(key);
                        self.out.push_str("[]");
                    }
                    return;
                }

                let separator = options.separator();
                for (i, item) in kept.enumerate() {
                    if i == 0 {
                        self.begin();
                        self.encoded(key);
                        self.out.push_str(if bracketed { "[]=" } else { "=" });
                    } else {
                        self.out.push(separator);
                    }
                    if !item.is_null() {
                        self.scalar(item);
                    }
                }
            }
        }
    }
}

/// Text of a non-string value, following JavaScript's `String(value)`
fn scalar_text(value: &QueryValue) -> String {
    match value {
        QueryValue::Null => String::new(),
        QueryValue::String(s) => s.clone(),
        QueryValue::Number(n) => format_number(*n),
        QueryValue::Bool(b) => b.to_string(),
        QueryValue::Array(items) => {
            let mut text = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    text.push(',');
                }
                text.push_str(&scalar_text(item));
            }
            text
        }
    }
}

#[allow(clippy::float_cmp)]
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return String::from("NaN");
    }
    if n.is_infinite() {
        return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        // Also covers -0
        return String::from("0");
    }
    let mut text = String::new();
    let _ = write!(text, "{n}");
    text
}
