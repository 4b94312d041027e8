use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiDnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub r#type: String,
}

/// Full-replacement body for `PUT /zones/:zone_id/dns_records/:record_id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DnsRecordUpdate {
    pub r#type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("DNS record not found: {name} (type: {record_type})")]
    NotFound { name: String, record_type: String },

    #[error("request to Cloudflare failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cloudflare API error: {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("Cloudflare API error: {0}")]
    Api(String),
}

/// Result of a mutation, forwarded to the HTTP caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
}

impl UpdateOutcome {
    pub fn updated() -> Self {
        Self {
            success: true,
            message: "DNS record updated successfully.".to_string(),
        }
    }

    pub fn failed(error: &ProviderError) -> Self {
        let message = match error {
            ProviderError::NotFound { .. } => "DNS record not found.".to_string(),
            ProviderError::Transport(e) => format!("Error updating DNS record: {}", e),
            ProviderError::Status { .. } | ProviderError::Api(_) => error.to_string(),
        };
        Self {
            success: false,
            message,
        }
    }
}

impl From<Result<(), ProviderError>> for UpdateOutcome {
    fn from(result: Result<(), ProviderError>) -> Self {
        match result {
            Ok(_) => Self::updated(),
            Err(e) => Self::failed(&e),
        }
    }
}
