use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn raw text into a typed entry field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Occurs when a ledger line does not split into
    /// exactly four comma-separated fields.
    #[error("expected 4 comma-separated fields, found {0}")]
    FieldCount(usize),
    /// Occurs when a date is not a valid `YYYY-MM-DD` calendar day
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    Date(String),
    /// Occurs when an amount is not a base-10 integer
    #[error("invalid amount {0:?}, expected a whole number")]
    Amount(String),
    /// Occurs when an entry position is not a non-negative integer
    #[error("invalid entry index {0:?}")]
    Index(String),
    /// Occurs when a text field contains the field delimiter or a line break,
    /// which the file format has no way to escape.
    #[error("{field} must not contain a comma or a line break")]
    Delimiter { field: &'static str },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A line of the backing file could not be parsed.
    /// Lines are counted from 1.
    #[error("malformed ledger line {line}: {source}")]
    Corrupt { line: usize, source: ParseError },
    #[error("no entry at index {0}")]
    IndexOutOfRange(usize),
    /// The totals do not fit in an amount.
    #[error("{0} total is too large to compute")]
    Overflow(&'static str),
    #[error("cannot access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
