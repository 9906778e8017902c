#![forbid(unsafe_code)]

//! File-based mailbox shared by a simulator host and the guest program it
//! executes.

pub mod config;
pub mod errors;
pub mod exchange;
pub mod mailbox;

pub use config::MailboxConfig;
pub use errors::{AppError, Result};
