use anyhow::{Context, Result};
use std::{env, fmt};
use validator::Validate;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_PORT: u16 = 3000;
// Kept short so a line switch propagates quickly.
pub const DEFAULT_RECORD_TTL: u32 = 120;

/// Process-wide settings, read once at startup.
#[derive(Clone, Validate)]
pub struct Config {
    #[validate(length(min = 1, message = "CLOUDFLARE_API_TOKEN cannot be empty"))]
    pub api_token: String,

    #[validate(length(min = 1, message = "CLOUDFLARE_ZONE_ID cannot be empty"))]
    pub zone_id: String,

    #[validate(length(min = 1, message = "DNS_RECORD_TYPE cannot be empty"))]
    pub record_type: String,

    #[validate(length(min = 1, message = "DNS_RECORD_NAME cannot be empty"))]
    pub record_name: String,

    #[validate(range(min = 1, message = "DNS_RECORD_TTL must be greater than 0"))]
    pub record_ttl: u32,

    pub main_line_ip: Option<String>,
    pub backup_line_ip: Option<String>,

    #[validate(length(min = 1, message = "PASSWORD cannot be empty"))]
    pub password: String,

    pub port: u16,

    #[validate(url(message = "CLOUDFLARE_API_BASE_URL must be a valid URL"))]
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Empty values are
    /// treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("{} is not defined in the environment variables", key))
        };

        let port: u16 = match get("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let record_ttl: u32 = match get("DNS_RECORD_TTL") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DNS_RECORD_TTL is not a valid TTL: {}", raw))?,
            None => DEFAULT_RECORD_TTL,
        };

        let config = Self {
            api_token: require("CLOUDFLARE_API_TOKEN")?,
            zone_id: require("CLOUDFLARE_ZONE_ID")?,
            record_type: require("DNS_RECORD_TYPE")?,
            record_name: require("DNS_RECORD_NAME")?,
            record_ttl,
            main_line_ip: get("MAIN_LINE_IP"),
            backup_line_ip: get("BACKUP_LINE_IP"),
            password: require("PASSWORD")?,
            port,
            api_base_url: get("CLOUDFLARE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        };

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

// Keeps the API token and password out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_type", &self.record_type)
            .field("record_name", &self.record_name)
            .field("record_ttl", &self.record_ttl)
            .field("main_line_ip", &self.main_line_ip)
            .field("backup_line_ip", &self.backup_line_ip)
            .field("password", &"<REDACTED>")
            .field("port", &self.port)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
