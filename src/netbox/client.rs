use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

use super::types::*;

/// NetBox API client
pub struct NetBoxClient {
    base_url: String,
    token: String,
    client: Client,
}

impl NetBoxClient {
    pub fn new(url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Perform a GET list request, following `next` links until the
    /// collection is exhausted.
    async fn list_paginated<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut url = self.api_url(endpoint);

        loop {
            let resp = self
                .client
                .get(&url)
                .header("Authorization", self.auth_header())
                .header("Accept", "application/json")
                .send()
                .await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(anyhow::anyhow!("NetBox API error {}: {}", status, body));
            }

            let page: PaginatedResponse<T> = resp.json().await?;
            results.extend(page.results);

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(results)
    }

    /// All devices, across pages
    pub async fn list_devices(&self) -> Result<Vec<NbDevice>> {
        self.list_paginated("/dcim/devices/?limit=1000").await
    }

    /// All virtual machines, across pages
    pub async fn list_virtual_machines(&self) -> Result<Vec<NbDevice>> {
        self.list_paginated("/virtualization/virtual-machines/?limit=1000").await
    }
}
