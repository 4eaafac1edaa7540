//! Simulator trace grammar.
//!
//! Each trace line is classified as a data record, as ignorable simulator chatter, or as a
//! [`ParseError`] when it has the shape of a record but does not parse.
//!
//! - Decode record: optional `#`, an 8-digit hex instruction word, then 17 fields, each
//!   `x`/`X` (undriven) or a signed decimal. Any line starting with an 8-digit hex word and
//!   at least one more token is held to this grammar.
//! - Core record: optional `#`, a decimal address, then a signed decimal result. Any line of
//!   two or more tokens made only of digits, signs and `x`/`z` that starts with a decimal is
//!   held to this grammar.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::common::constants::DECODE_FIELDS;
use crate::common::error::ParseError;

// Patterns are literals; construction cannot fail at runtime.
#[allow(clippy::expect_used)]
static DECODE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?\s*([0-9a-fA-F]{8})\s+(.*\S)\s*$").expect("decode record pattern")
});

#[allow(clippy::expect_used)]
static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[xX]|-?\d+)$").expect("decode field pattern"));

#[allow(clippy::expect_used)]
static CORE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?\s*(\d+)((?:\s+[-0-9xXzZ]+)+)\s*$").expect("core record pattern")
});

/// One decode field as printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Undriven or unknown (`x`).
    Unknown,
    /// Numeric value.
    Value(i64),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("x"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// A decoder trace record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeRecord {
    /// One-based line number.
    pub line_no: usize,
    /// Instruction word as printed.
    pub encoding: String,
    /// Instruction word.
    pub word: u32,
    /// Decoder outputs in column order.
    pub fields: [Field; DECODE_FIELDS],
}

/// A core trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreRecord {
    /// One-based line number.
    pub line_no: usize,
    /// Output address.
    pub address: u32,
    /// Stored value.
    pub value: i64,
}

fn error(line_no: usize, line: &str, reason: impl Into<String>) -> ParseError {
    ParseError { line_no, line: line.to_string(), reason: reason.into() }
}

/// Classifies one line of a decoder trace.
///
/// # Returns
///
/// `Ok(None)` for ignorable lines.
///
/// # Errors
///
/// [`ParseError`] for a line that starts like a record but breaks the grammar.
pub fn decode_line(line_no: usize, line: &str) -> Result<Option<DecodeRecord>, ParseError> {
    let Some(caps) = DECODE_CANDIDATE.captures(line) else {
        return Ok(None);
    };
    let encoding = caps.get(1).map_or("", |m| m.as_str());
    let rest = caps.get(2).map_or("", |m| m.as_str());
    let word = u32::from_str_radix(encoding, 16).map_err(|e| error(line_no, line, e.to_string()))?;

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() != DECODE_FIELDS {
        return Err(error(
            line_no,
            line,
            format!("expected {DECODE_FIELDS} fields, found {}", tokens.len()),
        ));
    }
    let mut fields = [Field::Unknown; DECODE_FIELDS];
    for (slot, token) in fields.iter_mut().zip(tokens) {
        if !FIELD.is_match(token) {
            return Err(error(line_no, line, format!("bad field {token:?}")));
        }
        if !token.eq_ignore_ascii_case("x") {
            let value = token.parse().map_err(|_| error(line_no, line, format!("bad field {token:?}")))?;
            *slot = Field::Value(value);
        }
    }
    Ok(Some(DecodeRecord { line_no, encoding: encoding.to_string(), word, fields }))
}

/// Classifies one line of a core trace.
///
/// # Returns
///
/// `Ok(None)` for ignorable lines.
///
/// # Errors
///
/// [`ParseError`] for a line that starts like a record but breaks the grammar.
pub fn core_line(line_no: usize, line: &str) -> Result<Option<CoreRecord>, ParseError> {
    let Some(caps) = CORE_CANDIDATE.captures(line) else {
        return Ok(None);
    };
    let address = caps.get(1).map_or("", |m| m.as_str());
    let rest: Vec<&str> = caps.get(2).map_or("", |m| m.as_str()).split_whitespace().collect();
    let [value] = rest.as_slice() else {
        return Err(error(line_no, line, format!("expected 2 columns, found {}", rest.len() + 1)));
    };
    let address = address.parse().map_err(|_| error(line_no, line, "address out of range"))?;
    let value = value.parse().map_err(|_| error(line_no, line, format!("bad value {value:?}")))?;
    Ok(Some(CoreRecord { line_no, address, value }))
}

/// Iterates the records of a decoder trace in order, stopping at nothing.
pub fn decode_records(trace: &str) -> impl Iterator<Item = Result<DecodeRecord, ParseError>> + '_ {
    trace
        .lines()
        .enumerate()
        .filter_map(|(i, line)| decode_line(i + 1, line).transpose())
}

/// Iterates the records of a core trace in order.
pub fn core_records(trace: &str) -> impl Iterator<Item = Result<CoreRecord, ParseError>> + '_ {
    trace
        .lines()
        .enumerate()
        .filter_map(|(i, line)| core_line(i + 1, line).transpose())
}
