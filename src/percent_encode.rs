use crate::compat::{Cow, String};
use crate::error::{LocationError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

// Encode sets for query components
// Based on encodeURIComponent (RFC 3986 unreserved characters)

/// Component percent-encode set
/// Everything except A-Z a-z 0-9 - _ . ! ~ * ' ( )
pub const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strict component percent-encode set
/// `COMPONENT_SET` + ! * ' ( ), leaving only RFC 3986 unreserved characters
pub const STRICT_COMPONENT_SET: &AsciiSet = &COMPONENT_SET
    .add(b'!')
    .add(b'*')
    .add(b'\'')
    .add(b'(')
    .add(b')');

/// Write percent-encoded string directly to buffer
pub fn percent_encode_into(buffer: &mut String, input: &str, encode_set: &'static AsciiSet) {
    buffer.reserve(input.len());

    for chunk in utf8_percent_encode(input, encode_set) {
        buffer.push_str(chunk);
    }
}

/// Percent-encode a query key or value into buffer
pub fn encode_component_into(buffer: &mut String, input: &str, strict: bool) {
    let set = if strict {
        STRICT_COMPONENT_SET
    } else {
        COMPONENT_SET
    };
    percent_encode_into(buffer, input, set);
}

/// Decode a component from a query string.
///
/// Lenient: a `%` not followed by two hex digits is kept as-is, and byte
/// sequences that are not valid UTF-8 are replaced with U+FFFD.
/// `+` is NOT translated here; the codec does that before splitting pairs.
pub fn decode_component(input: &str) -> Cow<'_, str> {
    if memchr::memchr(b'%', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    percent_decode_str(input).decode_utf8().unwrap_or_else(|_| {
        tracing::trace!(input, "query component is not valid UTF-8 after decoding");
        percent_decode_str(input).decode_utf8_lossy()
    })
}

/// Escapes of the characters that delimit or structure a URI.
/// Pathname decoding leaves them encoded so `?` and `#` never leak into
/// the pathname.
const RESERVED_ESCAPES: [&str; 11] = [
    "%23", "%24", "%26", "%2B", "%2C", "%2F", "%3A", "%3B", "%3D", "%3F", "%40",
];

/// Decode a percent-encoded pathname, keeping reserved escapes as written
pub fn decode_pathname(input: &str) -> Result<String> {
    let mut decoded = String::with_capacity(input.len());
    let mut start = 0;
    for pos in memchr::memchr_iter(b'%', input.as_bytes()) {
        let Some(escape) = input.get(pos..pos + 3) else {
            continue;
        };
        if RESERVED_ESCAPES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(escape))
        {
            decoded.push_str(&decode_strict(&input[start..pos])?);
            decoded.push_str(escape);
            start = pos + 3;
        }
    }
    decoded.push_str(&decode_strict(&input[start..])?);
    Ok(decoded)
}

fn decode_strict(input: &str) -> Result<Cow<'_, str>> {
    percent_decode_str(input)
        .decode_utf8()
        .map_err(|_| LocationError::InvalidPercentEncoding)
}
