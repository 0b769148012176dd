use anyhow::Result;
use log::info;
use serde_json::Value;
use std::io::Write;
use tokio::io::AsyncBufRead;

use crate::prompt::{Console, Intent};
use crate::provider::cloudflare::CloudflareClient;
use crate::provider::{DnsRecord, RecordPayload};

/// Fetches the zone's records and prints them numbered from 1.
pub async fn list_records<R, W>(
    client: &CloudflareClient,
    console: &mut Console<R, W>,
) -> Result<Vec<DnsRecord>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let records = client.list_records().await?;

    let out = console.out();
    writeln!(out, "Existing DNS Records:")?;
    for (index, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{}: {} - {} - {} (Proxied: {}, ID: {})",
            index + 1,
            record.name,
            record.record_type,
            record.content,
            record.proxied,
            record.id
        )?;
    }

    Ok(records)
}

pub async fn create_record<R, W>(
    client: &CloudflareClient,
    console: &mut Console<R, W>,
    domain: &str,
    ip: &str,
    proxied: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let payload = RecordPayload::a_record(domain, ip, proxied);

    if !console.confirm(&Intent::Create(&payload)).await? {
        return cancel(console);
    }

    let response = client.create_record(&payload).await?;
    info!("Created record {} with IP {}", domain, ip);
    print_response(console, "Record created:", &response)
}

/// Points `record` at `new_ip`, keeping its name and type.
pub async fn update_record<R, W>(
    client: &CloudflareClient,
    console: &mut Console<R, W>,
    record: &DnsRecord,
    new_ip: &str,
    proxied: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let payload = RecordPayload::replacing(record, new_ip, proxied);

    let intent = Intent::Update {
        old: record,
        new: &payload,
    };
    if !console.confirm(&intent).await? {
        return cancel(console);
    }

    let response = client.update_record(&record.id, &payload).await?;
    info!(
        "Updated record {} from {} to {}",
        record.name, record.content, new_ip
    );
    print_response(console, "Record updated:", &response)
}

pub async fn delete_record<R, W>(
    client: &CloudflareClient,
    console: &mut Console<R, W>,
    record: &DnsRecord,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !console.confirm(&Intent::Delete(record)).await? {
        return cancel(console);
    }

    let response = client.delete_record(&record.id).await?;
    info!("Deleted record {} ({})", record.name, record.id);
    print_response(console, "Record deleted:", &response)
}

fn cancel<R, W>(console: &mut Console<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Operation canceled by user");
    writeln!(console.out(), "Operation canceled.")?;
    Ok(())
}

fn print_response<R, W>(console: &mut Console<R, W>, label: &str, response: &Value) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let body = serde_json::to_string_pretty(response)?;
    writeln!(console.out(), "{} {}", label, body)?;
    Ok(())
}
