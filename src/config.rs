//! Mailbox configuration parsing and validation.
//!
//! Both parties must agree on where the record lives and which fields it
//! carries before either of them runs. That agreement is made here, at
//! configuration time, and never passed as a per-call argument.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

/// Well-known record location shared by guest and host.
pub const DEFAULT_RECORD_PATH: &str = "mailbox.txt";

/// Field carried by the record when none are configured.
pub const DEFAULT_FIELD: &str = "value";

fn default_record_path() -> PathBuf {
    PathBuf::from(DEFAULT_RECORD_PATH)
}

fn default_fields() -> Vec<String> {
    vec![DEFAULT_FIELD.into()]
}

fn default_iterations() -> u32 {
    2
}

/// Mailbox configuration parsed from `mailbox.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct MailboxConfig {
    /// Path of the record file both parties resolve.
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,
    /// Ordered field names carried by the record.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    /// Value substituted for every field when a lenient read finds no record.
    #[serde(default)]
    pub default_value: i64,
    /// Number of guest loop iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            record_path: default_record_path(),
            fields: default_fields(),
            default_value: 0,
            iterations: default_iterations(),
        }
    }
}

impl MailboxConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the shared record.
    #[must_use]
    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    /// Check the invariants both parties rely on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.record_path.as_os_str().is_empty() {
            return Err(AppError::Config("record_path must not be empty".into()));
        }

        if self.fields.is_empty() {
            return Err(AppError::Config("fields must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            validate_field_name(field).map_err(AppError::Config)?;
            if !seen.insert(field.as_str()) {
                return Err(AppError::Config(format!("duplicate field '{field}'")));
            }
        }

        if self.iterations == 0 {
            return Err(AppError::Config(
                "iterations must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Check that `name` can appear on the left of a `name=value` line.
///
/// # Errors
///
/// Returns a human-readable reason when the name is empty, contains `=` or
/// a line break, or carries surrounding whitespace.
pub fn validate_field_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("field name must not be empty".into());
    }
    if name.contains('=') {
        return Err(format!("field name '{name}' must not contain '='"));
    }
    if name.contains(['\n', '\r']) {
        return Err(format!("field name {name:?} must not contain a line break"));
    }
    if name.trim() != name {
        return Err(format!(
            "field name {name:?} must not have surrounding whitespace"
        ));
    }
    Ok(())
}
