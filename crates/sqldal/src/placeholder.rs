//! Named placeholders (`:name`).
//!
//! Generation turns field mappings into clause fragments; scanning finds the
//! markers already present in a statement, so the binder can reject names the
//! statement does not use and positional drivers can rewrite them to `$n`.

use crate::value::Fields;

/// `"<name> = :<name>"` per field, in input order. Used for WHERE and SET.
pub fn assignments(fields: &Fields) -> Vec<String> {
    fields.names().map(|n| format!("{n} = :{n}")).collect()
}

/// `":<name>"` per field, in input order. Used for INSERT VALUES.
pub fn values(fields: &Fields) -> Vec<String> {
    fields.names().map(|n| format!(":{n}")).collect()
}

/// `"<column> = :<marker>"` per pair.
pub fn assignments_with_markers<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<String> {
    pairs
        .into_iter()
        .map(|(column, marker)| format!("{column} = :{marker}"))
        .collect()
}

/// A marker found in statement text; `start..end` covers the leading `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_name_char(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Find the end of a quoted run starting at `i` (the opening quote).
/// A doubled quote is an escape. Unterminated runs extend to the end.
fn skip_quoted(bytes: &[u8], i: usize, quote: u8) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == quote {
            if bytes.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

/// End of an `E'...'` string starting at `i` (the quote). Backslash escapes
/// the next byte.
fn skip_escape_string(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\'' if bytes.get(j + 1) == Some(&b'\'') => j += 2,
            b'\'' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// If a dollar-quote opening tag (`$$` or `$tag$`) starts at `i`, return the
/// end of the whole quoted body.
fn skip_dollar_quoted(sql: &str, i: usize) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut j = i + 1;
    if j < bytes.len() && is_name_start(bytes[j]) {
        while j < bytes.len() && is_name_char(bytes[j]) {
            j += 1;
        }
    }
    if bytes.get(j) != Some(&b'$') {
        return None;
    }
    let tag = &sql[i..=j];
    let body = j + 1;
    Some(sql[body..].find(tag).map_or(bytes.len(), |p| body + p + tag.len()))
}

/// Bytes that continue an identifier, so a following `$` or `E'` is not a
/// quote opener.
fn continues_word(b: u8) -> bool {
    is_name_char(b) || b == b'$' || !b.is_ascii()
}

/// Scan statement text for `:name` markers.
///
/// Skips string literals (including `E'...'` and dollar-quoted bodies),
/// quoted identifiers, comments and `::` casts.
pub fn markers(sql: &str) -> Vec<Marker> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let after_word = i > 0 && continues_word(bytes[i - 1]);
        match bytes[i] {
            b'e' | b'E' if !after_word && bytes.get(i + 1) == Some(&b'\'') => {
                i = skip_escape_string(bytes, i + 1);
            }
            b'$' if !after_word => {
                i = skip_dollar_quoted(sql, i).unwrap_or(i + 1);
            }
            b'\'' | b'"' => i = skip_quoted(bytes, i, bytes[i]),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = sql[i..].find('\n').map_or(bytes.len(), |p| i + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = sql[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes.get(i + 1).copied().is_some_and(is_name_start) => {
                let start = i;
                let mut end = i + 2;
                while end < bytes.len() && is_name_char(bytes[end]) {
                    end += 1;
                }
                out.push(Marker {
                    name: sql[start + 1..end].to_string(),
                    start,
                    end,
                });
                i = end;
            }
            _ => i += 1,
        }
    }

    out
}

/// Rewrite named markers into `$1, $2, ...`.
///
/// A name used more than once reuses its index. Returns the rewritten SQL and
/// the marker names in parameter order.
pub fn to_positional(sql: &str) -> (String, Vec<String>) {
    let mut names: Vec<String> = Vec::new();
    let mut out = String::with_capacity(sql.len());
    let mut last = 0;

    for marker in markers(sql) {
        let idx = match names.iter().position(|n| *n == marker.name) {
            Some(pos) => pos + 1,
            None => {
                names.push(marker.name);
                names.len()
            }
        };
        out.push_str(&sql[last..marker.start]);
        out.push('$');
        out.push_str(&idx.to_string());
        last = marker.end;
    }
    out.push_str(&sql[last..]);

    (out, names)
}
