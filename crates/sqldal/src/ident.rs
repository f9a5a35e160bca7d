//! SQL identifier validation.
//!
//! Table names, projected columns, ORDER BY columns and field names are placed
//! into statement text verbatim, so every one of them goes through [`Ident`]
//! before a statement is built.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL and escape `"` as `""`
//! - Field names (which double as marker names) must be a single unquoted part
//!   without `$`.

use crate::error::{DalError, DalResult};
use std::collections::BTreeSet;
use std::fmt;

/// One dot-separated part of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Bare name matching `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// `"..."` name; stored unescaped.
    Quoted(String),
}

impl IdentPart {
    fn name(&self) -> &str {
        match self {
            Self::Unquoted(s) | Self::Quoted(s) => s,
        }
    }
}

impl fmt::Display for IdentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unquoted(s) => f.write_str(s),
            Self::Quoted(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
        }
    }
}

/// A table or column name, possibly schema-qualified (`public."Users".id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

fn invalid(s: &str, reason: &str) -> DalError {
    DalError::validation(format!("invalid identifier '{s}': {reason}"))
}

fn is_bare(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Split a quoted part off `rest` (just past its opening `"`).
fn take_quoted(rest: &str) -> Option<(String, &str)> {
    let mut name = String::new();
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            name.push(c);
        } else if chars.next_if(|&(_, c)| c == '"').is_some() {
            name.push('"');
        } else {
            return Some((name, &rest[i + 1..]));
        }
    }
    None
}

impl Ident {
    /// Parse a dotted identifier whose parts are bare or double-quoted.
    pub fn parse(s: &str) -> DalResult<Self> {
        if s.contains('\0') {
            return Err(invalid(s, "NUL character"));
        }

        let mut parts = Vec::new();
        let mut rest = s;
        loop {
            let (part, tail) = match rest.strip_prefix('"') {
                Some(quoted) => {
                    let (name, tail) =
                        take_quoted(quoted).ok_or_else(|| invalid(s, "unclosed quote"))?;
                    if name.is_empty() {
                        return Err(invalid(s, "empty quoted part"));
                    }
                    (IdentPart::Quoted(name), tail)
                }
                None => {
                    let end = rest.find('.').unwrap_or(rest.len());
                    let name = &rest[..end];
                    if !is_bare(name) {
                        return Err(invalid(s, &format!("'{name}' is not a valid name")));
                    }
                    (IdentPart::Unquoted(name.to_string()), &rest[end..])
                }
            };
            parts.push(part);

            match tail.strip_prefix('.') {
                Some(next) => rest = next,
                None if tail.is_empty() => break,
                None => return Err(invalid(s, "expected '.' after quoted part")),
            }
        }

        Ok(Self { parts })
    }

    /// Parse a field name. Field names are also used as marker names, so they
    /// must be a single unquoted part matching `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn field(s: &str) -> DalResult<Self> {
        let ident = Self::parse(s)?;
        match ident.parts.as_slice() {
            [IdentPart::Unquoted(name)] if !name.contains('$') => Ok(ident),
            _ => Err(DalError::validation(format!(
                "Field name '{s}' must be a plain identifier"
            ))),
        }
    }

    /// The last part of the identifier, i.e. the name a result column gets.
    pub fn name(&self) -> &str {
        self.parts.last().map_or("", IdentPart::name)
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// The SELECT list: either `*` or a list of identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<Ident>),
}

impl Projection {
    /// Parse `*` or a comma-separated column list such as `id, name`.
    pub fn parse(s: &str) -> DalResult<Self> {
        let s = s.trim();
        if s == "*" {
            return Ok(Self::All);
        }
        let columns = s
            .split(',')
            .map(|c| Ident::parse(c.trim()))
            .collect::<DalResult<Vec<_>>>()?;
        Ok(Self::Columns(columns))
    }

    pub fn to_sql(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::Columns(cols) => cols
                .iter()
                .map(Ident::to_sql)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Validate a table name, optionally against an allow-list.
pub(crate) fn check_table(table: &str, allowed: Option<&BTreeSet<String>>) -> DalResult<Ident> {
    let ident = Ident::parse(table)?;
    if let Some(allowed) = allowed {
        if !allowed.contains(table) {
            return Err(DalError::validation(format!(
                "Table '{table}' is not in the allowed table list"
            )));
        }
    }
    Ok(ident)
}
