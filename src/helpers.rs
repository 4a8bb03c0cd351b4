use crate::compat::{String, Vec};

/// Prune fragment (#hash) from a path string
/// Returns (`path_without_fragment`, `fragment_without_hash`)
pub fn prune_fragment(input: &str) -> (&str, Option<&str>) {
    memchr::memchr(b'#', input.as_bytes()).map_or((input, None), |pos| {
        (&input[..pos], Some(&input[pos + 1..]))
    })
}

/// Prune search (?query) from a path string that has no fragment
/// Returns (`pathname`, `search_without_question_mark`)
pub fn prune_search(input: &str) -> (&str, Option<&str>) {
    memchr::memchr(b'?', input.as_bytes()).map_or((input, None), |pos| {
        (&input[..pos], Some(&input[pos + 1..]))
    })
}

/// Resolve a relative pathname against an absolute one.
///
/// The last segment of `from` is replaced by `to`, then `.` and `..`
/// segments are collapsed. `..` never climbs above the root.
/// A trailing `.`, `..` or empty segment keeps a trailing slash.
pub fn resolve_pathname(to: &str, from: &str) -> String {
    let mut parts: Vec<&str> = if to.starts_with('/') {
        to.split('/').collect()
    } else {
        let mut parts: Vec<&str> = from.split('/').collect();
        parts.pop();
        parts.extend(to.split('/'));
        parts
    };
    if parts.first() != Some(&"") {
        parts.insert(0, "");
    }

    let trailing_slash = matches!(parts.last(), Some(&("." | ".." | "")));

    let mut resolved: Vec<&str> = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            "." => {}
            ".." => {
                if resolved.len() > 1 {
                    resolved.pop();
                }
            }
            _ => resolved.push(part),
        }
    }

    let mut result = resolved.join("/");
    if result.is_empty() || (trailing_slash && !result.ends_with('/')) {
        result.push('/');
    }
    result
}
