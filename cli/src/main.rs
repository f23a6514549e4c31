//! TicketChain CLI - ops console for the ticket registry.
//!
//! Subcommands mirror the registry surface:
//!
//! ```text
//! tickr mint <to> <ticket> <quantity>
//! tickr transfer <from> <to> <ticket> <quantity>
//! tickr burn <owner> <ticket> <quantity>
//! tickr balance <owner> <ticket>
//! tickr owns <owner> <ticket>
//! ```
//!
//! Results print as pretty JSON on stdout; logs go to stderr. With no
//! contract configured every operation runs against the simulated backend,
//! which makes this a convenient smoke console for local development.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use tickr_config::Settings;
use tickr_registry::TicketRegistry;
use tickr_types::{Address, TicketId};

const USAGE: &str = "\
usage: tickr <command> [args]

commands:
  mint <to> <ticket> <quantity>
  transfer <from> <to> <ticket> <quantity>
  burn <owner> <ticket> <quantity>
  balance <owner> <ticket>
  owns <owner> <ticket>";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let settings = Settings::load().context("failed to load configuration")?;
    let registry = TicketRegistry::from_settings(&settings);

    match args.as_slice() {
        ["mint", to, ticket, quantity] => {
            let result = registry
                .mint(&address(to)?, &TicketId::new(*ticket), parse_quantity(quantity)?)
                .await?;
            print_json(&result)
        }
        ["transfer", from, to, ticket, quantity] => {
            let result = registry
                .transfer(
                    &address(from)?,
                    &address(to)?,
                    &TicketId::new(*ticket),
                    parse_quantity(quantity)?,
                )
                .await?;
            print_json(&result)
        }
        ["burn", owner, ticket, quantity] => {
            let result = registry
                .burn(&address(owner)?, &TicketId::new(*ticket), parse_quantity(quantity)?)
                .await?;
            print_json(&result)
        }
        ["balance", owner, ticket] => {
            let balance = registry
                .balance_of(&address(owner)?, &TicketId::new(*ticket))
                .await?;
            println!("{balance}");
            Ok(())
        }
        ["owns", owner, ticket] => {
            let owns = registry
                .owns(&address(owner)?, &TicketId::new(*ticket))
                .await?;
            println!("{owns}");
            Ok(())
        }
        [] => bail!("missing command\n\n{USAGE}"),
        _ => bail!("unrecognized arguments\n\n{USAGE}"),
    }
}

fn address(raw: &str) -> Result<Address> {
    Address::new(raw).with_context(|| format!("invalid address '{raw}'"))
}

fn parse_quantity(raw: &str) -> Result<u32> {
    raw.parse()
        .with_context(|| format!("invalid quantity '{raw}': expected a positive integer"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
