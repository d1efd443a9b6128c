use std::time::Duration;

use crate::error::{Error, Result};
use crate::server::GameServer;
use crate::stats::{Period, PeriodStats};

/// HTTP client for the hub API.
///
/// Thin wrapper over [`reqwest::Client`]; cheap to clone and share between
/// tasks.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
}

impl HubClient {
    /// Create a client against the given base URL with the default 10 s
    /// request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a client with an explicit request timeout. Trailing slashes
    /// on the base URL are stripped so paths can be appended verbatim.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stationwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    /// All servers currently tracked by the hub.
    pub async fn servers(&self) -> Result<Vec<GameServer>> {
        self.get_json(format!("{}/servers", self.base_url)).await
    }

    /// One server by BYOND world id.
    pub async fn server(&self, world_id: u64) -> Result<GameServer> {
        self.get_json(format!("{}/servers/{}", self.base_url, world_id))
            .await
    }

    /// One server by host and game port.
    pub async fn server_by_address(&self, host: &str, port: u16) -> Result<GameServer> {
        self.get_json(format!("{}/servers/{}/{}", self.base_url, host, port))
            .await
    }

    /// Player statistics for one server over the given period.
    pub async fn server_stats(&self, world_id: u64, period: Period) -> Result<PeriodStats> {
        self.get_stats(format!(
            "{}/servers/{}/stats?period={}",
            self.base_url, world_id, period
        ))
        .await
    }

    /// Player statistics for one server addressed by host and port.
    pub async fn server_stats_by_address(
        &self,
        host: &str,
        port: u16,
        period: Period,
    ) -> Result<PeriodStats> {
        self.get_stats(format!(
            "{}/servers/{}/{}/stats?period={}",
            self.base_url, host, port, period
        ))
        .await
    }

    /// Hub-wide player statistics over the given period.
    pub async fn global_stats(&self, period: Period) -> Result<PeriodStats> {
        self.get_stats(format!("{}/stats?period={}", self.base_url, period))
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!(%url, "Fetching from hub");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Stats payloads get their own decode path: a body that is not valid
    /// statistics is a [`Error::MalformedStats`], not a transport failure,
    /// and the aggregate arrays are normalized before handing them out.
    async fn get_stats(&self, url: String) -> Result<PeriodStats> {
        tracing::debug!(%url, "Fetching stats from hub");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let stats: PeriodStats = response
            .json()
            .await
            .map_err(|e| Error::MalformedStats(e.to_string()))?;
        Ok(stats.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = HubClient::new("https://hub.example.com/").unwrap();
        assert_eq!(client.base_url, "https://hub.example.com");

        let client = HubClient::new("https://hub.example.com").unwrap();
        assert_eq!(client.base_url, "https://hub.example.com");
    }
}
