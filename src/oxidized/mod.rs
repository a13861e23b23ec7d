use anyhow::Result;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client for the configuration-backup service (oxidized).
pub struct OxidizedClient {
    base_url: String,
    client: Client,
}

impl OxidizedClient {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Last known running configuration for a hostname.
    /// None when the backup service has no copy of this element.
    pub async fn get_element_config(&self, hostname: &str) -> Result<Option<String>> {
        let url = format!("{}/node/fetch/{}", self.base_url, hostname);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!(
                "Backup service error {} for {}",
                resp.status(),
                hostname
            ));
        }

        Ok(Some(resp.text().await?))
    }
}
