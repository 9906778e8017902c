//! Ordered log of every mailbox access made during an exchange.

use serde::Serialize;

use super::Party;
use crate::mailbox::Record;

/// Direction of a mailbox access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// The party decoded the record.
    Read,
    /// The party replaced the record.
    Write,
}

/// One mailbox access and the record it saw or produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeEvent {
    /// Who touched the record.
    pub party: Party,
    /// Whether it was read or written.
    pub access: Access,
    /// Record observed (read) or emitted (write).
    pub record: Record,
}

/// Accesses in the order they happened.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ExchangeJournal {
    events: Vec<ExchangeEvent>,
}

impl ExchangeJournal {
    /// Append an access.
    pub fn push(&mut self, party: Party, access: Access, record: &Record) {
        self.events.push(ExchangeEvent {
            party,
            access,
            record: record.clone(),
        });
    }

    /// All accesses so far.
    #[must_use]
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    /// Number of accesses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Values of `field` across all accesses, skipping events that lack it.
    #[must_use]
    pub fn values_of(&self, field: &str) -> Vec<i64> {
        self.events
            .iter()
            .filter_map(|event| event.record.get(field))
            .collect()
    }

    /// Whether every read after the first observed exactly the record
    /// written by the other party immediately before it.
    ///
    /// The first read may only see the reset state, so it is not checked.
    /// The guest's final read follows the host's last write, which keeps the
    /// rule uniform.
    #[must_use]
    pub fn alternates(&self) -> bool {
        self.events
            .windows(2)
            .filter(|pair| pair[1].access == Access::Read)
            .all(|pair| {
                let (write, read) = (&pair[0], &pair[1]);
                write.access == Access::Write
                    && write.party != read.party
                    && write.record == read.record
            })
    }
}
