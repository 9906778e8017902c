#![forbid(unsafe_code)]

//! `sim-mailbox`: guest main sequence.
//!
//! Resets the shared record, runs the configured number of exchange
//! iterations against an in-process incrementing host, then prints what the
//! final read observed.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use sim_mailbox::exchange::{Guest, Host};
use sim_mailbox::mailbox::{codec, Mailbox};
use sim_mailbox::{AppError, MailboxConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sim-mailbox", about = "Run the guest side of the mailbox exchange", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the full exchange report as JSON instead of the final record.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    let config = match &args.config {
        Some(path) => MailboxConfig::load_from_path(path)?,
        None => MailboxConfig::default(),
    };
    info!(
        path = %config.record_path().display(),
        fields = ?config.fields,
        "configuration loaded"
    );

    let mut mailbox = Mailbox::from_config(&config);
    let mut guest = Guest::incrementing(config.fields.clone(), config.default_value);
    let mut host = Host::incrementing(config.fields.clone());

    let report = guest.run(&mut mailbox, config.iterations, &mut host)?;
    if !report.journal.alternates() {
        warn!("journal shows a read that did not observe the preceding write");
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(format!("failed to render report: {err}")))?;
        println!("{rendered}");
    } else {
        print!("{}", codec::encode(&report.final_record));
    }

    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
