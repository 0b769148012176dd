use anyhow::{Context, Result};
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{DnsRecord, RecordPayload};
use crate::config::CloudflareConfig;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx answer. Displays the provider body so the user sees its error list.
    #[error("{}", rejection_message(.status, .body))]
    Rejected { status: StatusCode, body: String },
    #[error("Cloudflare API error: {0}")]
    Unsuccessful(String),
}

fn rejection_message(status: &StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        format!("Request failed with status code {}", status.as_u16())
    } else {
        body.to_string()
    }
}

/// Client for the records endpoint of one zone.
pub struct CloudflareClient {
    client: Client,
    config: CloudflareConfig,
    headers: HeaderMap,
}

impl CloudflareClient {
    pub fn new(client: Client, config: &CloudflareConfig) -> Result<Self> {
        Ok(Self {
            client,
            headers: config.headers()?,
            config: config.clone(),
        })
    }

    pub async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let url = self.config.records_url();
        debug!("GET {}", url);

        let text = self.send(self.client.get(&url)).await?;
        let response: CloudflareListResponse =
            serde_json::from_str(&text).context("Failed to parse Cloudflare response")?;

        if !response.success {
            let errors: Vec<String> = response
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            return Err(ApiError::Unsuccessful(errors.join(", ")).into());
        }

        let records = response.result.unwrap_or_default();
        debug!("Fetched {} record(s)", records.len());
        Ok(records)
    }

    pub async fn create_record(&self, payload: &RecordPayload) -> Result<Value> {
        let url = self.config.records_url();
        debug!("POST {} ({} -> {})", url, payload.name, payload.content);

        let text = self.send(self.client.post(&url).json(payload)).await?;
        parse_body(&text)
    }

    pub async fn update_record(&self, record_id: &str, payload: &RecordPayload) -> Result<Value> {
        let url = self.config.record_url(record_id);
        debug!("PUT {} ({} -> {})", url, payload.name, payload.content);

        let text = self.send(self.client.put(&url).json(payload)).await?;
        parse_body(&text)
    }

    pub async fn delete_record(&self, record_id: &str) -> Result<Value> {
        let url = self.config.record_url(record_id);
        debug!("DELETE {}", url);

        let text = self.send(self.client.delete(&url)).await?;
        parse_body(&text)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .context("Failed to send request to Cloudflare")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Cloudflare response")?;

        if !status.is_success() {
            debug!("Cloudflare answered {}", status);
            return Err(ApiError::Rejected { status, body }.into());
        }

        Ok(body)
    }
}

fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).context("Failed to parse Cloudflare response")
}

// Cloudflare API types

#[derive(Debug, Deserialize)]
struct CloudflareListResponse {
    success: bool,
    #[serde(default)]
    errors: Vec<CloudflareError>,
    #[serde(default)]
    result: Option<Vec<DnsRecord>>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    code: i32,
    message: String,
}
