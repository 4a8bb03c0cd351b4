use crate::codec;
use crate::compat::{String, ToString, Vec};
use crate::options::QueryOptions;

/// A single value in a parsed query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Key without `=`, e.g. `?flag`
    Null,
    String(String),
    /// Only produced when `parse_numbers` is enabled
    Number(f64),
    /// Only produced when `parse_booleans` is enabled
    Bool(bool),
    /// Repeated keys or one of the array formats
    Array(Vec<QueryValue>),
}

impl QueryValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[QueryValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>, const N: usize> From<[T; N]> for QueryValue {
    fn from(items: [T; N]) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Parsed query component of a location.
///
/// Keys are unique and kept in insertion order (or sorted, when parsed with
/// [`QueryOptions::sort`]). Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Parse from a query string (with or without leading `?`) using default options
    pub fn parse(search: &str) -> Self {
        codec::parse(search, &QueryOptions::default())
    }

    /// Parse from a query string with the given options
    pub fn parse_with(search: &str, options: &QueryOptions) -> Self {
        codec::parse(search, options)
    }

    /// Serialize without leading `?`, or empty string if no parameters.
    pub fn stringify(&self, options: &QueryOptions) -> String {
        codec::stringify(self, options)
    }

    /// Set `key` to `value`, returning the previous value.
    /// An existing key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.get_mut(&key) {
            return Some(core::mem::replace(slot, value));
        }
        self.params.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut QueryValue> {
        self.params
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let pos = self.params.iter().position(|(k, _)| k == key)?;
        Some(self.params.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    /// Sort parameters by key.
    pub fn sort(&mut self) {
        self.params.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &QueryValue> {
        self.params.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        query.extend(iter);
        query
    }
}

impl<K: Into<String>, V: Into<QueryValue>> Extend<(K, V)> for Query {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Query {
    type Item = (String, QueryValue);
    type IntoIter = <Vec<(String, QueryValue)> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

/// Display uses the default [`QueryOptions`]
impl core::fmt::Display for Query {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.stringify(&QueryOptions::default()))
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Build a [`Query`] from `key => value` pairs.
///
/// ```
/// use locq::{query, QueryValue};
///
/// let q = query! { "one" => 1, "two" => "value", "arr" => ["A", "B"] };
/// assert_eq!(q.get("one"), Some(&QueryValue::Number(1.0)));
/// ```
#[macro_export]
macro_rules! query {
    () => {
        $crate::Query::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut query = $crate::Query::new();
        $(query.insert($key, $value);)+
        query
    }};
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{Query, QueryValue};
    use crate::compat::{String, Vec};
    use core::fmt;
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for QueryValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::String(s) => serializer.serialize_str(s),
                Self::Number(n) => serializer.serialize_f64(*n),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Array(items) => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
            }
        }
    }

    impl Serialize for Query {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }

    struct ValueVisitor;

    impl<'de> Visitor<'de> for ValueVisitor {
        type Value = QueryValue;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean, null or array")
        }

        fn visit_unit<E: de::Error>(self) -> Result<QueryValue, E> {
            Ok(QueryValue::Null)
        }

        fn visit_none<E: de::Error>(self) -> Result<QueryValue, E> {
            Ok(QueryValue::Null)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<QueryValue, E> {
            Ok(QueryValue::Bool(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<QueryValue, E> {
            Ok(QueryValue::Number(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<QueryValue, E> {
            Ok(QueryValue::Number(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<QueryValue, E> {
            Ok(QueryValue::Number(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<QueryValue, E> {
            Ok(QueryValue::String(String::from(v)))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<QueryValue, E> {
            Ok(QueryValue::String(v))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<QueryValue, A::Error> {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element()? {
                items.push(item);
            }
            Ok(QueryValue::Array(items))
        }
    }

    impl<'de> Deserialize<'de> for QueryValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ValueVisitor)
        }
    }

    struct QueryVisitor;

    impl<'de> Visitor<'de> for QueryVisitor {
        type Value = Query;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of query parameters")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Query, A::Error> {
            let mut query = Query::new();
            while let Some((key, value)) = map.next_entry::<String, QueryValue>()? {
                query.insert(key, value);
            }
            Ok(query)
        }
    }

    impl<'de> Deserialize<'de> for Query {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(QueryVisitor)
        }
    }
}
