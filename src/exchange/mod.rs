//! Exchange protocol between a guest program and its simulator host.
//!
//! The guest owns the [`Mailbox`] for the whole run. Each iteration it
//! reads, computes, writes, then hands the host `&mut Mailbox` through a
//! blocking [`UnitOfWork::run`] call. The host cannot touch the record
//! outside that call, and the guest cannot touch it while the call is in
//! progress, so every read observes the other party's most recent write.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{debug, info};

use crate::mailbox::{Mailbox, OnAbsent, Record};
use crate::Result;

pub mod journal;

pub use journal::{Access, ExchangeEvent, ExchangeJournal};

/// The two roles that share a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// The program executed on behalf of the simulator.
    Guest,
    /// The long-running simulator process.
    Host,
}

impl Display for Party {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Host => write!(f, "host"),
        }
    }
}

/// The host's hook, invoked once per unit of work.
///
/// Implementations must read, compute, and write before returning; the
/// caller is suspended for the whole call.
pub trait UnitOfWork {
    /// Perform one unit of work against `mailbox`, noting each access in
    /// `journal`.
    ///
    /// # Errors
    ///
    /// Any mailbox failure; the caller must treat it as fatal.
    fn run(&mut self, mailbox: &mut Mailbox, journal: &mut ExchangeJournal) -> Result<()>;
}

/// Add one to every field, wrapping on overflow.
#[must_use]
pub fn increment_all(record: &Record) -> Record {
    record
        .iter()
        .fold(Record::new(), |next, (name, value)| {
            next.with_field(name, value.wrapping_add(1))
        })
}

/// Host side of the protocol: strict read, compute, write.
#[derive(Debug)]
pub struct Host<F> {
    fields: Vec<String>,
    compute: F,
    invocations: u64,
}

impl<F> Host<F>
where
    F: FnMut(&Record) -> Record,
{
    /// Host expecting `fields` and deriving each new record with `compute`.
    pub fn new(fields: Vec<String>, compute: F) -> Self {
        Self {
            fields,
            compute,
            invocations: 0,
        }
    }

    /// Number of completed units of work.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

impl Host<fn(&Record) -> Record> {
    /// Host that increments every field.
    #[must_use]
    pub fn incrementing(fields: Vec<String>) -> Self {
        Self::new(fields, increment_all)
    }
}

impl<F> UnitOfWork for Host<F>
where
    F: FnMut(&Record) -> Record,
{
    fn run(&mut self, mailbox: &mut Mailbox, journal: &mut ExchangeJournal) -> Result<()> {
        let current = mailbox.read(&self.fields, OnAbsent::Fail)?;
        journal.push(Party::Host, Access::Read, &current);

        let next = (self.compute)(&current);
        mailbox.write(&next)?;
        journal.push(Party::Host, Access::Write, &next);

        self.invocations += 1;
        debug!(invocation = self.invocations, ?next, "host unit of work complete");
        Ok(())
    }
}

/// Outcome of a full guest run.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReport {
    /// Number of loop iterations performed.
    pub iterations: u32,
    /// Every read and write, in the order they happened.
    pub journal: ExchangeJournal,
    /// What the guest observed on its final read.
    pub final_record: Record,
}

impl ExchangeReport {
    /// Values of `field` across the journal, in access order.
    #[must_use]
    pub fn values_of(&self, field: &str) -> Vec<i64> {
        self.journal.values_of(field)
    }
}

/// Guest side of the protocol: drives the loop and invokes the host.
#[derive(Debug)]
pub struct Guest<F> {
    fields: Vec<String>,
    default_value: i64,
    compute: F,
}

impl<F> Guest<F>
where
    F: FnMut(&Record) -> Record,
{
    /// Guest expecting `fields`, substituting `default_value` when the
    /// record is absent, and deriving each new record with `compute`.
    pub fn new(fields: Vec<String>, default_value: i64, compute: F) -> Self {
        Self {
            fields,
            default_value,
            compute,
        }
    }

    /// Run the full main sequence against `mailbox`.
    ///
    /// 1. Clear any stale record.
    /// 2. For each of `iterations`: lenient read, compute, write, then
    ///    invoke `host` and wait for it to return.
    /// 3. One final lenient read to observe the host's last write.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the mailbox or the host. Nothing
    /// is retried.
    pub fn run<H: UnitOfWork>(
        &mut self,
        mailbox: &mut Mailbox,
        iterations: u32,
        host: &mut H,
    ) -> Result<ExchangeReport> {
        let on_absent = OnAbsent::Default(self.default_value);
        let mut journal = ExchangeJournal::default();

        mailbox.reset()?;
        info!(path = %mailbox.path().display(), iterations, "channel reset, starting exchange");

        for iteration in 1..=iterations {
            let current = mailbox.read(&self.fields, on_absent)?;
            journal.push(Party::Guest, Access::Read, &current);

            let next = (self.compute)(&current);
            mailbox.write(&next)?;
            journal.push(Party::Guest, Access::Write, &next);

            debug!(iteration, "invoking host");
            host.run(mailbox, &mut journal)?;
        }

        let final_record = mailbox.read(&self.fields, on_absent)?;
        journal.push(Party::Guest, Access::Read, &final_record);
        info!(?final_record, events = journal.len(), "exchange complete");

        Ok(ExchangeReport {
            iterations,
            journal,
            final_record,
        })
    }
}

impl Guest<fn(&Record) -> Record> {
    /// Guest that increments every field.
    #[must_use]
    pub fn incrementing(fields: Vec<String>, default_value: i64) -> Self {
        Self::new(fields, default_value, increment_all)
    }
}
