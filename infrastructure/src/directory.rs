//! Directory of upstream weather servers
//!
//! Built once at startup and shared by reference; there is no process-wide
//! registry. Entries are probed with `GET {base_url}/health`.

use crate::http::{HttpSetupError, build_client, normalize_base_url};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Name under which the weather-tool server is registered
pub const WEATHER_SERVER: &str = "weather-server";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    Error,
    #[default]
    Unknown,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
            ServerStatus::Error => "error",
            ServerStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream server and what it offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub name: String,
    pub base_url: String,
    pub description: String,
    pub tools: Vec<String>,
    pub tags: Vec<String>,
    pub status: ServerStatus,
    pub last_check: Option<DateTime<Utc>>,
}

impl ServerEntry {
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        description: impl Into<String>,
    ) -> Result<Self, HttpSetupError> {
        Ok(Self {
            name: name.into(),
            base_url: normalize_base_url(base_url)?,
            description: description.into(),
            tools: Vec::new(),
            tags: Vec::new(),
            status: ServerStatus::Unknown,
            last_check: None,
        })
    }

    /// The weather-tool server entry at `base_url`
    pub fn weather_server(base_url: &str) -> Result<Self, HttpSetupError> {
        Ok(
            Self::new(
                WEATHER_SERVER,
                base_url,
                "Weather information service using NWS API and wttr.in",
            )?
            .with_tools(["get_weather", "get_forecast", "get_alerts"])
            .with_tags(["weather", "forecast", "alerts", "location"]),
        )
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Counts per status plus the entries themselves
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectorySummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub error: usize,
    pub unknown: usize,
    pub servers: Vec<ServerEntry>,
}

pub struct SourceDirectory {
    client: Client,
    entries: RwLock<BTreeMap<String, ServerEntry>>,
}

impl SourceDirectory {
    pub fn new() -> Result<Self, HttpSetupError> {
        Ok(Self {
            client: build_client(HEALTH_TIMEOUT)?,
            entries: RwLock::new(BTreeMap::new()),
        })
    }

    /// A directory holding only the weather-tool server
    pub async fn with_weather_server(base_url: &str) -> Result<Self, HttpSetupError> {
        let directory = Self::new()?;
        directory.register(ServerEntry::weather_server(base_url)?).await;
        Ok(directory)
    }

    /// Add or replace an entry by name
    pub async fn register(&self, entry: ServerEntry) {
        debug!("Registering server {} at {}", entry.name, entry.base_url);
        self.entries.write().await.insert(entry.name.clone(), entry);
    }

    pub async fn get(&self, name: &str) -> Option<ServerEntry> {
        self.entries.read().await.get(name).cloned()
    }

    /// All entries, optionally only those with `status`
    pub async fn list(&self, status: Option<ServerStatus>) -> Vec<ServerEntry> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect()
    }

    pub async fn by_tag(&self, tag: &str) -> Vec<ServerEntry> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .cloned()
            .collect()
    }

    /// Probe one server and record the result. Unknown names stay unknown.
    pub async fn health_check(&self, name: &str) -> ServerStatus {
        let Some(base_url) = self.get(name).await.map(|e| e.base_url) else {
            return ServerStatus::Unknown;
        };

        let status = match self.client.get(format!("{base_url}/health")).send().await {
            Ok(response) if response.status().is_success() => ServerStatus::Online,
            Ok(_) => ServerStatus::Error,
            Err(e) if e.is_connect() => ServerStatus::Offline,
            Err(_) => ServerStatus::Error,
        };

        if let Some(entry) = self.entries.write().await.get_mut(name) {
            entry.status = status;
            entry.last_check = Some(Utc::now());
        }
        info!("Health check {}: {}", name, status);
        status
    }

    /// Probe every server concurrently
    pub async fn health_check_all(&self) -> BTreeMap<String, ServerStatus> {
        let names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        let statuses = join_all(names.iter().map(|n| self.health_check(n))).await;
        names.into_iter().zip(statuses).collect()
    }

    pub async fn summary(&self) -> DirectorySummary {
        let servers = self.list(None).await;
        let mut summary = DirectorySummary {
            total: servers.len(),
            ..DirectorySummary::default()
        };
        for server in &servers {
            match server.status {
                ServerStatus::Online => summary.online += 1,
                ServerStatus::Offline => summary.offline += 1,
                ServerStatus::Error => summary.error += 1,
                ServerStatus::Unknown => summary.unknown += 1,
            }
        }
        summary.servers = servers;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_by_name_and_tag() {
        let directory = SourceDirectory::with_weather_server("http://localhost:8000/")
            .await
            .unwrap();
        directory
            .register(
                ServerEntry::new("geo", "http://localhost:9000", "Geocoder")
                    .unwrap()
                    .with_tags(["location"]),
            )
            .await;

        let weather = directory.get(WEATHER_SERVER).await.unwrap();
        assert_eq!(weather.base_url, "http://localhost:8000");
        assert_eq!(weather.tools.len(), 3);
        assert!(directory.get("missing").await.is_none());

        let names: Vec<String> = directory
            .by_tag("location")
            .await
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["geo", "weather-server"]);
        assert!(directory.by_tag("forecast").await.len() == 1);
    }

    #[tokio::test]
    async fn test_health_check_records_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let directory = SourceDirectory::with_weather_server(&server.uri())
            .await
            .unwrap();
        assert_eq!(
            directory.health_check(WEATHER_SERVER).await,
            ServerStatus::Online
        );

        let entry = directory.get(WEATHER_SERVER).await.unwrap();
        assert_eq!(entry.status, ServerStatus::Online);
        assert!(entry.last_check.is_some());
        assert_eq!(directory.list(Some(ServerStatus::Online)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_health_check_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let directory = SourceDirectory::new().unwrap();
        directory
            .register(ServerEntry::new("flaky", &server.uri(), "Flaky").unwrap())
            .await;

        let statuses = directory.health_check_all().await;
        assert_eq!(statuses.get("flaky"), Some(&ServerStatus::Error));

        let summary = directory.summary().await;
        assert_eq!(summary.total, 1);
        assert_eq!(summary.error, 1);
    }

    #[tokio::test]
    async fn test_unknown_server_is_unknown() {
        let directory = SourceDirectory::new().unwrap();
        assert_eq!(
            directory.health_check("nope").await,
            ServerStatus::Unknown
        );
    }
}
