use super::models::*;
use async_trait::async_trait;

#[async_trait]
pub trait DnsApiClient: Send + Sync {
    /// Id of the first record in `zone_id` whose name and type match exactly.
    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &str,
    ) -> Result<String, ProviderError>;

    async fn get_current_value(&self, name: &str) -> Result<String, ProviderError>;

    /// Never fails; upstream errors are folded into the outcome.
    async fn update_value(&self, name: &str, content: &str) -> UpdateOutcome;
}
