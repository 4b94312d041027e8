use super::{client::DnsApiClient, models::*};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

pub struct CloudflareClient {
    client: reqwest::Client,
    base_url: String,
    zone_id: String,
    record_type: String,
    ttl: u32,
}

#[async_trait]
impl DnsApiClient for CloudflareClient {
    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &str,
    ) -> Result<String, ProviderError> {
        debug!("Looking up record ID: {} (type: {})", name, record_type);

        let response = self
            .client
            .get(format!("{}/zones/{}/dns_records", self.base_url, zone_id))
            .query(&[("name", name), ("type", record_type)])
            .send()
            .await
            .map_err(|e| log_failure("Error finding DNS record", e.into()))?;

        let records: Vec<ApiDnsRecord> = read_result(response).await?;
        let record = records
            .into_iter()
            .find(|record| record.name == name && record.r#type == record_type)
            .ok_or_else(|| ProviderError::NotFound {
                name: name.to_string(),
                record_type: record_type.to_string(),
            })?;

        debug!("Found record ID: {}", record.id);
        Ok(record.id)
    }

    async fn get_current_value(&self, name: &str) -> Result<String, ProviderError> {
        let record_id = self.resolve_record_id(name).await?;

        let response = self
            .client
            .get(self.record_url(&record_id))
            .send()
            .await
            .map_err(|e| log_failure("Error getting current DNS record IP", e.into()))?;

        let record: ApiDnsRecord = read_result(response).await?;
        Ok(record.content)
    }

    async fn update_value(&self, name: &str, content: &str) -> UpdateOutcome {
        let result = self.put_record(name, content).await;
        if result.is_ok() {
            info!("DNS record updated: {} -> {}", name, content);
        }
        result.into()
    }
}

impl CloudflareClient {
    /// Builds the HTTP client with the bearer credential installed up front,
    /// so every outbound call is authenticated.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(Self::build_headers(&config.api_token)?)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            zone_id: config.zone_id.clone(),
            record_type: config.record_type.clone(),
            ttl: config.record_ttl,
        })
    }

    fn build_headers(api_token: &str) -> Result<HeaderMap> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_token))
            .context("CLOUDFLARE_API_TOKEN is not a valid header value")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        )
    }

    async fn resolve_record_id(&self, name: &str) -> Result<String, ProviderError> {
        self.find_record_id(&self.zone_id, name, &self.record_type)
            .await
            .map_err(|e| {
                if matches!(e, ProviderError::NotFound { .. }) {
                    error!("DNS record not found: {} (type: {})", name, self.record_type);
                }
                e
            })
    }

    async fn put_record(&self, name: &str, content: &str) -> Result<(), ProviderError> {
        let record_id = self.resolve_record_id(name).await?;

        let payload = DnsRecordUpdate {
            r#type: self.record_type.clone(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: self.ttl,
        };

        let response = self
            .client
            .put(self.record_url(&record_id))
            .json(&payload)
            .send()
            .await
            .map_err(|e| log_failure("Error updating DNS record", e.into()))?;

        // Only the success flag matters; the echoed record is not needed.
        read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}

/// Checks the HTTP status and the envelope's success flag, logging whatever
/// went wrong.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let error = ProviderError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        };
        return Err(log_failure("Cloudflare API Error", error));
    }

    let envelope: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| log_failure("Failed to parse Cloudflare response", e.into()))?;

    if !envelope.success {
        let errors = serde_json::to_string(&envelope.errors).unwrap_or_default();
        return Err(log_failure("Cloudflare API Error", ProviderError::Api(errors)));
    }

    Ok(envelope)
}

async fn read_result<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    read_envelope(response).await?.result.ok_or_else(|| {
        log_failure(
            "Cloudflare API Error",
            ProviderError::Api("response carried no result".to_string()),
        )
    })
}

fn log_failure(context: &str, error: ProviderError) -> ProviderError {
    error!("{}: {}", context, error);
    error
}
