//! NordVPN directory API client
//!
//! Thin read-only client for two endpoints: server recommendations
//! (optionally filtered by country and capped by a result limit) and the
//! countries list. No caching, no retries, no pagination beyond the
//! server-side `limit` parameter.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Base address of the NordVPN public directory service.
pub const DEFAULT_API_BASE: &str = "https://api.nordvpn.com/v1";

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// One server as advertised by the recommendations endpoint.
///
/// Only the fields this tool consumes are deserialized; the API returns
/// many more.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub hostname: String,
    /// Reachable address of the server (the WireGuard endpoint host).
    pub station: String,
    #[serde(default)]
    pub load: u32,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub technologies: Vec<Technology>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub country: Country,
}

/// Country record, shared between server locations and the countries
/// endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Technology {
    pub identifier: String,
}

pub struct DirectoryClient {
    base_url: String,
    http: Client,
}

impl DirectoryClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Fetch recommended servers, best first.
    ///
    /// `country_code` and `limit` are only added to the query string when
    /// supplied; omission means absence, not an empty value.
    pub async fn recommended_servers(
        &self,
        country_code: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Server>, DirectoryError> {
        let url = format!("{}/servers/recommendations", self.base_url);
        let query = recommendation_query(country_code, limit);
        debug!("GET {} {:?}", url, query);

        let servers = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(servers)
    }

    /// Fetch the list of countries with available servers.
    pub async fn countries(&self) -> Result<Vec<Country>, DirectoryError> {
        let url = format!("{}/servers/countries", self.base_url);
        debug!("GET {}", url);

        let countries = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(countries)
    }

    /// CLI-facing variant of [`recommended_servers`](Self::recommended_servers):
    /// any failure is logged and collapsed into an empty list, so callers
    /// treat "no servers" and "service down" identically.
    pub async fn servers_or_empty(
        &self,
        country_code: Option<&str>,
        limit: Option<u32>,
    ) -> Vec<Server> {
        match self.recommended_servers(country_code, limit).await {
            Ok(servers) => servers,
            Err(e) => {
                warn!("Failed to fetch servers: {}", e);
                Vec::new()
            }
        }
    }

    /// CLI-facing variant of [`countries`](Self::countries) with the same
    /// collapse-to-empty policy.
    pub async fn countries_or_empty(&self) -> Vec<Country> {
        match self.countries().await {
            Ok(countries) => countries,
            Err(e) => {
                warn!("Failed to fetch countries: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for DirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn recommendation_query(country_code: Option<&str>, limit: Option<u32>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(code) = country_code {
        query.push(("filters[country_code]", code.to_string()));
    }
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}
