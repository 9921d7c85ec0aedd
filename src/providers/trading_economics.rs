use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Source of raw page markup. The parsing layer consumes whatever text this
/// returns; tests swap in a fixture-backed implementation.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;
}

/// Fetches the Trading Economics commodities page.
pub struct TradingEconomicsSource {
    base_url: String,
}

impl TradingEconomicsSource {
    pub fn new(base_url: &str) -> Self {
        TradingEconomicsSource {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl PageSource for TradingEconomicsSource {
    async fn fetch_page(&self) -> Result<String> {
        let url = format!("{}/commodities", self.base_url);
        debug!("Requesting commodities page from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to fetch commodities page from {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Commodities page request failed with status {}",
                response.status()
            ));
        }

        let body = response
            .text()
            .await
            .context("Failed to read commodities page body")?;

        if body.trim().is_empty() {
            return Err(anyhow!("Received empty commodities page from {}", url));
        }

        debug!("Fetched {} bytes of page markup", body.len());
        Ok(body)
    }
}
