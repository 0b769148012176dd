use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::net::Ipv4Addr;

#[derive(Debug, thiserror::Error)]
pub enum PublicIpError {
    #[error("Failed to fetch public IP: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to fetch public IP: no `ip` field in trace response")]
    MissingIp,
    #[error("Failed to fetch public IP: `{0}` is not an IPv4 address")]
    NotIpv4(String),
}

/// Splits a trace body into its `key=value` lines. Lines without `=` are skipped.
pub fn parse_trace(body: &str) -> HashMap<&str, &str> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Resolves this host's public IPv4 address from the trace endpoint.
pub async fn lookup(client: &Client, trace_url: &str) -> Result<Ipv4Addr, PublicIpError> {
    debug!("GET {}", trace_url);
    let body = client
        .get(trace_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let fields = parse_trace(&body);
    let ip = fields.get("ip").ok_or(PublicIpError::MissingIp)?;
    ip.parse()
        .map_err(|_| PublicIpError::NotIpv4(ip.to_string()))
}
