#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How arrays are written to, and read from, a query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ArrayFormat {
    /// Repeated keys: `a=1&a=2`
    #[default]
    None,
    /// `a[]=1&a[]=2`
    Bracket,
    /// `a[0]=1&a[1]=2`
    Index,
    /// `a=1,2`
    Comma,
    /// `a=1|2`, using [`QueryOptions::array_format_separator`]
    Separator,
    /// `a[]=1|2`, using [`QueryOptions::array_format_separator`]
    BracketSeparator,
}

impl ArrayFormat {
    /// Whether array items are packed into a single value
    pub(crate) fn is_joined(self) -> bool {
        matches!(self, Self::Comma | Self::Separator | Self::BracketSeparator)
    }
}

/// Options shared by [`parse`](crate::codec::parse) and
/// [`stringify`](crate::codec::stringify).
///
/// The same value must be given to both directions for a query to
/// round-trip. Construct with struct update syntax:
///
/// ```
/// use locq::QueryOptions;
///
/// let options = QueryOptions {
///     parse_numbers: true,
///     ..QueryOptions::default()
/// };
/// assert!(options.sort);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct QueryOptions {
    /// Turn numeric values into [`QueryValue::Number`](crate::QueryValue::Number)
    pub parse_numbers: bool,
    /// Turn `true`/`false` into [`QueryValue::Bool`](crate::QueryValue::Bool)
    pub parse_booleans: bool,
    pub array_format: ArrayFormat,
    /// Item separator for [`ArrayFormat::Separator`] and [`ArrayFormat::BracketSeparator`]
    pub array_format_separator: char,
    /// Order keys when parsing and stringifying
    pub sort: bool,
    /// Also percent-encode `!'()*`
    pub strict: bool,
    pub encode: bool,
    pub decode: bool,
    /// Omit keys whose value is null when stringifying
    pub skip_null: bool,
    /// Omit keys whose value is an empty string when stringifying
    pub skip_empty_string: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            parse_numbers: false,
            parse_booleans: false,
            array_format: ArrayFormat::None,
            array_format_separator: ',',
            sort: true,
            strict: true,
            encode: true,
            decode: true,
            skip_null: false,
            skip_empty_string: false,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Separator used by the packed array formats
    pub(crate) fn separator(&self) -> char {
        match self.array_format {
            ArrayFormat::Comma => ',',
            _ => self.array_format_separator,
        }
    }
}
