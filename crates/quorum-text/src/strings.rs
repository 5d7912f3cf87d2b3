//! Stateless string helpers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{TextError, TextResult};

/// Comma with surrounding ASCII whitespace (`[ \t\n\x0B\f\r]`)
static COMMA_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\s)*,(?-u:\s)*").expect("comma separator pattern is valid")
});

/// Space and every control character below it
fn is_trimmable(c: char) -> bool {
    c <= ' '
}

/// Split a comma separated string, trimming every value.
///
/// The outer trim strips spaces and control characters; separators absorb
/// ASCII whitespace only. Unicode spaces such as U+00A0 are kept.
/// `None` and blank input give an empty list. Empty segments between commas
/// are kept; empty segments at the end are dropped (`"a,,b,"` gives
/// `["a", "", "b"]`).
pub fn split_trimmed(s: Option<&str>) -> Vec<String> {
    let trimmed = match s.map(|v| v.trim_matches(is_trimmable)) {
        Some(t) if !t.is_empty() => t,
        _ => return Vec::new(),
    };

    let mut parts: Vec<String> = COMMA_SEPARATOR
        .split(trimmed)
        .map(str::to_owned)
        .collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Lowercase hex, two digits per byte, no separators.
///
/// Absent input (`None`) is a contract violation; an empty slice is fine.
pub fn bytes_to_hex(bytes: Option<&[u8]>) -> TextResult<String> {
    let bytes =
        bytes.ok_or_else(|| TextError::InvalidArgument("bytes must not be absent".into()))?;
    Ok(hex::encode(bytes))
}

/// `true`/`false` in any ASCII case; anything else yields `default_value`
pub fn parse_boolean(s: Option<&str>, default_value: bool) -> bool {
    match s {
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        _ => default_value,
    }
}

/// Element right after the first occurrence of `given`.
///
/// Wraps to the first element when `given` is last or missing. Scans the
/// items once, so any iterator works.
pub fn cyclic_next<'a, T, I>(given: &T, items: I) -> TextResult<&'a T>
where
    T: PartialEq + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut iter = items.into_iter();
    let first = iter.next().ok_or_else(|| {
        TextError::InvalidArgument("cyclic_next needs at least one candidate".into())
    })?;

    let mut current = first;
    for next in iter {
        if current == given {
            return Ok(next);
        }
        current = next;
    }
    Ok(first)
}
