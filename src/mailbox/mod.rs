//! The mailbox: a one-slot, overwrite-only channel backed by a record file.
//!
//! [`Mailbox`] is the only way to touch the record. Reads borrow the handle
//! shared; writes and resets need `&mut Mailbox`, so the party that may
//! mutate the channel is whichever one currently holds the unique borrow.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::config::{validate_field_name, MailboxConfig};
use crate::{AppError, Result};

pub mod codec;

/// Ordered set of named integer values carried by the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, i64)>,
}

impl Record {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::insert`].
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: i64) -> Self {
        self.insert(name, value);
        self
    }

    /// Record carrying `value` for every name in `names`, in order.
    #[must_use]
    pub fn filled<S: AsRef<str>>(names: &[S], value: i64) -> Self {
        names
            .iter()
            .fold(Self::new(), |record, name| record.with_field(name.as_ref(), value))
    }

    /// Set `name` to `value`, keeping its position if already present.
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| *value)
    }

    /// Fields in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Field names in encoding order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Serialized as a JSON object whose keys keep encoding order.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// What a read does when the record does not exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnAbsent {
    /// Absence is fatal; used by the host, which expects the guest to have
    /// initialized the channel before invoking it.
    Fail,
    /// Absence yields this value for every requested name; used by the
    /// guest, which may run first on a fresh system.
    Default(i64),
}

/// Handle over the well-known record path.
#[derive(Debug)]
pub struct Mailbox {
    path: PathBuf,
}

impl Mailbox {
    /// Handle for the record at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Handle for the record configured in `config`.
    #[must_use]
    pub fn from_config(config: &MailboxConfig) -> Self {
        Self::new(config.record_path())
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the record currently exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the record, expecting exactly `names` in order.
    ///
    /// # Errors
    ///
    /// - `AppError::ChannelAbsent` if the record does not exist and
    ///   `on_absent` is [`OnAbsent::Fail`].
    /// - `AppError::Io` if the record exists but cannot be read.
    /// - `AppError::MalformedRecord` if the content does not decode; this is
    ///   fatal under both policies.
    pub fn read<S: AsRef<str>>(&self, names: &[S], on_absent: OnAbsent) -> Result<Record> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return match on_absent {
                    OnAbsent::Fail => Err(AppError::ChannelAbsent(format!(
                        "record {} does not exist",
                        self.path.display()
                    ))),
                    OnAbsent::Default(value) => {
                        warn!(
                            path = %self.path.display(),
                            value,
                            "record absent, substituting default"
                        );
                        Ok(Record::filled(names, value))
                    }
                };
            }
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(AppError::MalformedRecord(format!(
                    "record {} is not valid UTF-8",
                    self.path.display()
                )));
            }
            Err(err) => {
                return Err(AppError::Io(format!(
                    "failed to read record {}: {err}",
                    self.path.display()
                )));
            }
        };

        let record = codec::decode(&text, names)?;
        debug!(path = %self.path.display(), ?record, "record read");
        Ok(record)
    }

    /// Replace the record's contents with `record`.
    ///
    /// The file is opened for truncating write, so prior contents are
    /// discarded whatever their length.
    ///
    /// # Errors
    ///
    /// - `AppError::MalformedRecord` if a field name cannot be encoded; the
    ///   file is left untouched.
    /// - `AppError::ChannelUnwritable` if the file cannot be opened, written,
    ///   or flushed.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        for name in record.names() {
            validate_field_name(name).map_err(AppError::MalformedRecord)?;
        }

        let text = codec::encode(record);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|err| {
                AppError::ChannelUnwritable(format!(
                    "failed to open record {}: {err}",
                    self.path.display()
                ))
            })?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|err| {
                AppError::ChannelUnwritable(format!(
                    "failed to write record {}: {err}",
                    self.path.display()
                ))
            })?;

        debug!(path = %self.path.display(), ?record, "record written");
        Ok(())
    }

    /// Delete the record, returning the channel to its uninitialized state.
    ///
    /// An already-absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the record exists but cannot be removed.
    pub fn reset(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "record removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Io(format!(
                "failed to remove record {}: {err}",
                self.path.display()
            ))),
        }
    }
}
