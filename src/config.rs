use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "cf-records.toml";

pub const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_trace_url")]
    pub trace_url: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_trace_url() -> String {
    "https://cloudflare.com/cdn-cgi/trace".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            trace_url: default_trace_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_token: Option<String>, // 设置后改用 Bearer 鉴权
    #[serde(default)]
    pub zone_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            api_key: String::new(),
            api_token: None,
            zone_id: String::new(),
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Loads the TOML file (if any) and applies the `CLOUDFLARE_*` environment
    /// variables on top. An explicit path has to exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let cloudflare = &mut self.cloudflare;
        if let Some(email) = lookup(ENV_EMAIL) {
            cloudflare.email = email;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            cloudflare.api_key = api_key;
        }
        if let Some(zone_id) = lookup(ENV_ZONE_ID) {
            cloudflare.zone_id = zone_id;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            cloudflare.api_token = Some(token);
        }
        // An empty token from either source means key/email auth
        cloudflare.api_token = cloudflare.api_token.take().filter(|t| !t.is_empty());
    }
}

impl CloudflareConfig {
    pub fn records_url(&self) -> String {
        format!(
            "{}/zones/{}/dns_records",
            self.api_base.trim_end_matches('/'),
            self.zone_id
        )
    }

    pub fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Fixed header set sent with every provider request. Empty credentials are
    /// passed through as-is; the provider rejects them.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        match self.api_token.as_deref() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("API token is not a valid header value")?;
                headers.insert(AUTHORIZATION, value);
            }
            None => {
                let key = HeaderValue::from_str(&self.api_key)
                    .context("API key is not a valid header value")?;
                let email = HeaderValue::from_str(&self.email)
                    .context("Account email is not a valid header value")?;
                headers.insert("X-Auth-Key", key);
                headers.insert("X-Auth-Email", email);
            }
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// The active credential, shortened for logging.
    pub fn masked_api_key(&self) -> String {
        let secret = self.api_token.as_deref().unwrap_or(&self.api_key);
        let len = secret.len();
        if len > 10 && secret.is_ascii() {
            format!("{}***{}", &secret[..2], &secret[len - 2..])
        } else {
            "*".repeat(7)
        }
    }
}
