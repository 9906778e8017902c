//! Error types shared across the mailbox and its binaries.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering every mailbox failure mode.
///
/// None of these are recovered internally. The binaries surface them as a
/// diagnostic on stderr and a nonzero exit status.
#[derive(Debug)]
pub enum AppError {
    /// The record does not exist and the read policy forbids a default.
    ChannelAbsent(String),
    /// The record cannot be opened, written, or flushed.
    ChannelUnwritable(String),
    /// The record exists but does not match the expected `name=value` lines.
    MalformedRecord(String),
    /// Configuration parsing or validation failure.
    Config(String),
    /// Any other file-system or I/O failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelAbsent(msg) => write!(f, "channel absent: {msg}"),
            Self::ChannelUnwritable(msg) => write!(f, "channel unwritable: {msg}"),
            Self::MalformedRecord(msg) => write!(f, "malformed record: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}
