mod api;
mod config;
mod server;
mod switch;

#[cfg(test)]
mod tests;

use anyhow::Result;
use api::CloudflareClient;
use config::Config;
use log::info;
use std::sync::Arc;
use switch::SwitchService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables take precedence
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(Config::from_env()?);
    info!(
        "Managing {} record {} in zone {}",
        config.record_type, config.record_name, config.zone_id
    );

    let client = CloudflareClient::new(&config)?;
    let service = SwitchService::new(config.clone(), Arc::new(client));

    server::serve(config.port, service).await
}
