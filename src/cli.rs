use anyhow::{anyhow, bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use log::info;
use reqwest::Client;
use std::ffi::OsString;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use tokio::io::AsyncBufRead;

use crate::config::Config;
use crate::prompt::Console;
use crate::provider::cloudflare::CloudflareClient;
use crate::provider::DnsRecord;
use crate::{public_ip, records};

#[derive(Parser, Debug)]
#[command(name = "cf-records", version)]
#[command(about = "Manage the DNS A records of a Cloudflare zone")]
pub struct Cli {
    /// Path to the configuration file (defaults to ./cf-records.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List all DNS records
    List,
    /// Create a new DNS record
    Create {
        domain: String,
        ip: String,
        /// `true` or `false`, anything else means not proxied
        proxied: Option<String>,
    },
    /// Update an existing DNS record
    Update {
        /// Record number as shown by `list`
        #[arg(allow_hyphen_values = true)]
        index: String,
        ip: String,
        /// `true` or `false`, anything else keeps the current setting
        proxied: Option<String>,
    },
    /// Update an existing DNS record with this host's public IP
    UpdateAuto {
        #[arg(allow_hyphen_values = true)]
        index: String,
    },
    /// Delete a DNS record
    Delete {
        #[arg(allow_hyphen_values = true)]
        index: String,
    },
}

/// Parses argv into the config path and the command to run.
///
/// `Err` carries the exit status for invocations that end here: usage and
/// help (`help`, `--help`, `--version`, no arguments) exit 0, any other
/// command line error exits 1.
pub fn parse_args<I, T>(args: I) -> Result<(Option<PathBuf>, Command), u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures
            return Err(if e.use_stderr() { 1 } else { 0 });
        }
    };

    match cli.command {
        Some(command) => Ok((cli.config, command)),
        None => {
            let _ = Cli::command().print_help();
            println!();
            Err(0)
        }
    }
}

/// Only the literals `true` and `false` count.
pub fn parse_proxied(arg: Option<&str>) -> Option<bool> {
    match arg {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Maps a 1-based index from the command line onto the fetched listing.
pub fn select_record<'a>(records: &'a [DnsRecord], raw_index: &str) -> Result<&'a DnsRecord> {
    raw_index
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| records.get(index))
        .ok_or_else(|| anyhow!("Invalid index {}. Exiting.", raw_index))
}

fn ensure_ipv4(ip: &str) -> Result<()> {
    if ip.parse::<Ipv4Addr>().is_err() {
        bail!("Invalid IP address: {}", ip);
    }
    Ok(())
}

/// Runs one command: the listing first, then argument checks and the
/// selected operation.
pub async fn run<R, W>(command: Command, config: &Config, console: &mut Console<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let http = Client::new();
    let client = CloudflareClient::new(http.clone(), &config.cloudflare)?;

    let listing = records::list_records(&client, console).await?;

    match &command {
        Command::Create { ip, .. } | Command::Update { ip, .. } => ensure_ipv4(ip)?,
        _ => {}
    }

    match command {
        Command::List => {}
        Command::Create { domain, ip, proxied } => {
            let proxied = parse_proxied(proxied.as_deref()).unwrap_or(false);
            records::create_record(&client, console, &domain, &ip, proxied).await?;
        }
        Command::Update { index, ip, proxied } => {
            let record = select_record(&listing, &index)?;
            let proxied = parse_proxied(proxied.as_deref()).unwrap_or(record.proxied);
            records::update_record(&client, console, record, &ip, proxied).await?;
        }
        Command::UpdateAuto { index } => {
            let record = select_record(&listing, &index)?;
            let ip = public_ip::lookup(&http, &config.general.trace_url).await?;
            info!("Public IP is {}", ip);
            records::update_record(&client, console, record, &ip.to_string(), record.proxied)
                .await?;
        }
        Command::Delete { index } => {
            let record = select_record(&listing, &index)?;
            records::delete_record(&client, console, record).await?;
        }
    }

    Ok(())
}
