//! Text codec for the record.
//!
//! A record is plain text with one `name=value` line per field, each line
//! terminated by `\n`. There is no header, version tag, or checksum, so
//! decoding is positional: line `i` must carry the `i`-th expected name.

use std::fmt::Write as _;

use regex::Regex;

use super::Record;
use crate::{AppError, Result};

/// Pattern each record line must match: a name without `=`, then a signed
/// base-10 integer.
pub const LINE_PATTERN: &str = r"^([^=]+)=([+-]?[0-9]+)$";

/// Encode `record` as `name=value\n` lines in record order.
///
/// Encoding is deterministic: the same record always yields byte-identical
/// text.
#[must_use]
pub fn encode(record: &Record) -> String {
    let mut out = String::new();
    for (name, value) in record.iter() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{name}={value}");
    }
    out
}

/// Decode `text` into a record carrying exactly `names`, in that order.
///
/// A missing newline after the last line is tolerated; `\r\n` line endings
/// are accepted as well.
///
/// # Errors
///
/// Returns `AppError::MalformedRecord` when the line count differs from
/// `names.len()`, a line does not match [`LINE_PATTERN`], a line carries an
/// unexpected name, or a value does not fit in an `i64`.
pub fn decode<S: AsRef<str>>(text: &str, names: &[S]) -> Result<Record> {
    let pattern = Regex::new(LINE_PATTERN)
        .map_err(|err| AppError::MalformedRecord(format!("line pattern invalid: {err}")))?;

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != names.len() {
        return Err(AppError::MalformedRecord(format!(
            "expected {} field(s), found {} line(s)",
            names.len(),
            lines.len()
        )));
    }

    let mut record = Record::new();
    for (index, (line, expected)) in lines.iter().zip(names).enumerate() {
        let expected = expected.as_ref();
        let captures = pattern.captures(line).ok_or_else(|| {
            AppError::MalformedRecord(format!(
                "line {} does not match name=<integer>: {line:?}",
                index + 1
            ))
        })?;

        let name = &captures[1];
        if name != expected {
            return Err(AppError::MalformedRecord(format!(
                "line {} carries field '{name}', expected '{expected}'",
                index + 1
            )));
        }

        let value = captures[2].parse::<i64>().map_err(|err| {
            AppError::MalformedRecord(format!(
                "line {} value for '{expected}' is not an i64: {err}",
                index + 1
            ))
        })?;

        record.insert(expected, value);
    }

    Ok(record)
}
