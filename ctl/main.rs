#![forbid(unsafe_code)]

//! `sim-mailbox-ctl`: operator CLI over the shared record.
//!
//! Inspects and overwrites the record, and exposes the host's unit
//! of work as `step` so a simulator can invoke it as a blocking subprocess.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use sim_mailbox::exchange::{ExchangeJournal, Host, UnitOfWork};
use sim_mailbox::mailbox::{codec, Mailbox, OnAbsent};
use sim_mailbox::{AppError, MailboxConfig, Result};

#[derive(Debug, Parser)]
#[command(
    name = "sim-mailbox-ctl",
    about = "Inspect and drive the sim-mailbox record",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current record.
    Show {
        /// Substitute this value for every field when the record is absent
        /// instead of failing.
        #[arg(long, allow_negative_numbers = true)]
        default: Option<i64>,
        /// Print the record as a JSON object.
        #[arg(long)]
        json: bool,
    },

    /// Delete the record.
    Reset,

    /// Replace the record with the given `name=value` pairs.
    ///
    /// Pairs must name every configured field, in configured order.
    Set {
        /// Field assignments such as `value=42`.
        #[arg(required = true, allow_hyphen_values = true)]
        pairs: Vec<String>,
    },

    /// Run one host unit of work: strict read, increment, write.
    Step,
}

fn main() {
    let args = Cli::parse();
    init_tracing();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = match &args.config {
        Some(path) => MailboxConfig::load_from_path(path)?,
        None => MailboxConfig::default(),
    };
    let mut mailbox = Mailbox::from_config(&config);

    match &args.command {
        Command::Show { default, json } => {
            let on_absent = default.map_or(OnAbsent::Fail, OnAbsent::Default);
            let record = mailbox.read(&config.fields, on_absent)?;
            if *json {
                let rendered = serde_json::to_string(&record)
                    .map_err(|err| AppError::Io(format!("failed to render record: {err}")))?;
                println!("{rendered}");
            } else {
                print!("{}", codec::encode(&record));
            }
        }
        Command::Reset => {
            mailbox.reset()?;
            println!("OK");
        }
        Command::Set { pairs } => {
            let text = pairs.join("\n");
            let record = codec::decode(&text, &config.fields)?;
            mailbox.write(&record)?;
            print!("{}", codec::encode(&record));
        }
        Command::Step => {
            let mut host = Host::incrementing(config.fields.clone());
            let mut journal = ExchangeJournal::default();
            host.run(&mut mailbox, &mut journal)?;
            if let Some(written) = journal.events().last() {
                print!("{}", codec::encode(&written.record));
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
