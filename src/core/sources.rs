use crate::core::parser::parse_hosts;
use crate::domain::model::DomainSet;
use crate::domain::ports::{HostSource, Storage};
use crate::utils::error::{HostsError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const EDGE_BLOCKLIST_URL: &str =
    "https://edge.microsoft.com/abusiveadblocking/api/v1/blocklist";

/// Label used for the local extras file, independent of its path.
pub const EXTRAS_LABEL: &str = "extras.txt";

async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Making request to: {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HostsError::ApiError {
            url: url.to_string(),
            source,
        })?;

    tracing::debug!("Response status from {}: {}", url, response.status());
    if !response.status().is_success() {
        return Err(HostsError::HttpStatusError {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(|source| HostsError::ApiError {
        url: url.to_string(),
        source,
    })
}

/// A remote list in `0.0.0.0 <host>` format.
pub struct HostsListSource {
    client: Client,
    url: String,
}

impl HostsListSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl HostSource for HostsListSource {
    fn label(&self) -> &str {
        &self.url
    }

    async fn collect_into(&self, hosts: &mut DomainSet) -> Result<usize> {
        validate_url("source", &self.url)?;
        let body = fetch_text(&self.client, &self.url).await?;
        parse_hosts(body.as_bytes(), &self.url, hosts)
            .map_err(|e| e.context(format!("error parsing {}", self.url)))
    }
}

/// Absent or null fields decode as empty, the same as a missing key.
#[derive(Debug, Deserialize)]
struct EdgeBlocklist {
    #[serde(default)]
    sites: Option<Vec<Option<EdgeSite>>>,
}

#[derive(Debug, Deserialize)]
struct EdgeSite {
    #[serde(default)]
    url: Option<String>,
}

/// Decodes the first JSON value in `body`; anything after it is ignored.
fn decode_edge_blocklist(body: &str) -> Result<EdgeBlocklist> {
    let first = serde_json::Deserializer::from_str(body)
        .into_iter::<EdgeBlocklist>()
        .next();
    // An empty body still has to fail, with serde_json's EOF error.
    let blocklist = match first {
        Some(decoded) => decoded?,
        None => serde_json::from_str(body)?,
    };
    Ok(blocklist)
}

/// Microsoft Edge abusive-ad blocklist, served as JSON.
///
/// Entries are trusted as-is: each site is added bare and with a `www.`
/// prefix, without going through the line parser.
pub struct EdgeBlocklistSource {
    client: Client,
    endpoint: String,
}

impl EdgeBlocklistSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl HostSource for EdgeBlocklistSource {
    fn label(&self) -> &str {
        &self.endpoint
    }

    async fn collect_into(&self, hosts: &mut DomainSet) -> Result<usize> {
        let body = fetch_text(&self.client, &self.endpoint).await?;
        let sites = decode_edge_blocklist(&body)?.sites.unwrap_or_default();

        for site in &sites {
            let url = site
                .as_ref()
                .and_then(|site| site.url.as_deref())
                .unwrap_or_default();
            if url.is_empty() {
                tracing::warn!("Microsoft Edge blocklist: skipping entry with empty url");
                continue;
            }
            hosts.insert(url);
            hosts.insert(format!("www.{}", url));
        }

        tracing::info!("Microsoft Edge blocklist: found {} hosts", sites.len());
        Ok(sites.len())
    }
}

/// Optional local list kept next to the source list.
pub struct ExtrasSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> ExtrasSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> HostSource for ExtrasSource<S> {
    fn label(&self) -> &str {
        EXTRAS_LABEL
    }

    async fn collect_into(&self, hosts: &mut DomainSet) -> Result<usize> {
        match self.storage.read_optional_file(&self.path).await? {
            Some(contents) => parse_hosts(contents.as_slice(), EXTRAS_LABEL, hosts),
            None => {
                tracing::debug!("No extras file at {}, skipping", self.path);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        fail_reads: bool,
    }

    impl MockStorage {
        async fn with_file(self, path: &str, data: &str) -> Self {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
            self
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.read_optional_file(path).await?.ok_or_else(|| {
                HostsError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn read_optional_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            if self.fail_reads {
                return Err(HostsError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                )));
            }
            Ok(self.files.lock().await.get(path).cloned())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_hosts_list_source_parses_body() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/hosts");
            then.status(200)
                .body("# list\n0.0.0.0 ads.example.com\n0.0.0.0 10.0.0.1\n");
        });

        let source = HostsListSource::new(Client::new(), server.url("/hosts"));
        let mut hosts = DomainSet::new();
        let found = source.collect_into(&mut hosts).await.unwrap();

        list_mock.assert();
        assert_eq!(found, 1);
        assert!(hosts.contains("ads.example.com"));
        assert_eq!(source.label(), server.url("/hosts"));
    }

    #[tokio::test]
    async fn test_hosts_list_source_non_success_status() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("0.0.0.0 not-found.example\n");
        });

        let source = HostsListSource::new(Client::new(), server.url("/missing"));
        let mut hosts = DomainSet::new();
        let err = source.collect_into(&mut hosts).await.unwrap_err();

        list_mock.assert();
        assert!(matches!(err, HostsError::HttpStatusError { .. }));
        assert!(err.to_string().contains(&server.url("/missing")));
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn test_hosts_list_source_empty_list_is_tagged() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(200).body("127.0.0.1 localhost\n");
        });

        let url = server.url("/empty");
        let source = HostsListSource::new(Client::new(), url.clone());
        let err = source.collect_into(&mut DomainSet::new()).await.unwrap_err();

        assert!(matches!(err.root_cause(), HostsError::NoHostsFoundError));
        assert_eq!(
            err.to_string(),
            format!("error parsing {}: did not find any hosts", url)
        );
    }

    #[tokio::test]
    async fn test_hosts_list_source_rejects_malformed_url() {
        let source = HostsListSource::new(Client::new(), "not a url");
        let err = source.collect_into(&mut DomainSet::new()).await.unwrap_err();

        assert!(matches!(err, HostsError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_edge_blocklist_adds_www_variant() {
        let server = MockServer::start();
        let edge_mock = server.mock(|when, then| {
            when.method(GET).path("/blocklist");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"sites": [{"url": "bad.example"}]}));
        });

        let source = EdgeBlocklistSource::new(Client::new(), server.url("/blocklist"));
        let mut hosts = DomainSet::new();
        let found = source.collect_into(&mut hosts).await.unwrap();

        edge_mock.assert();
        assert_eq!(found, 1);
        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains("bad.example"));
        assert!(hosts.contains("www.bad.example"));
    }

    #[tokio::test]
    async fn test_edge_blocklist_bypasses_parser_rules() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocklist");
            then.status(200).json_body(serde_json::json!({
                "sites": [{"url": "shop.001com"}, {"url": ""}, {"url": "extra.example", "id": 7}]
            }));
        });

        let source = EdgeBlocklistSource::new(Client::new(), server.url("/blocklist"));
        let mut hosts = DomainSet::new();
        let found = source.collect_into(&mut hosts).await.unwrap();

        assert_eq!(found, 3);
        assert!(hosts.contains("shop.001com"));
        assert!(hosts.contains("www.extra.example"));
        assert!(!hosts.contains(""));
        assert!(!hosts.contains("www."));
    }

    #[tokio::test]
    async fn test_edge_blocklist_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocklist");
            then.status(200).body("<html>maintenance</html>");
        });

        let source = EdgeBlocklistSource::new(Client::new(), server.url("/blocklist"));
        let err = source.collect_into(&mut DomainSet::new()).await.unwrap_err();

        assert!(matches!(err, HostsError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_edge_blocklist_without_sites_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocklist");
            then.status(200).json_body(serde_json::json!({}));
        });

        let source = EdgeBlocklistSource::new(Client::new(), server.url("/blocklist"));
        let mut hosts = DomainSet::new();

        assert_eq!(source.collect_into(&mut hosts).await.unwrap(), 0);
        assert!(hosts.is_empty());
    }

    async fn collect_edge_body(body: &'static str) -> Result<(usize, DomainSet)> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocklist");
            then.status(200).body(body);
        });

        let source = EdgeBlocklistSource::new(Client::new(), server.url("/blocklist"));
        let mut hosts = DomainSet::new();
        let found = source.collect_into(&mut hosts).await?;
        Ok((found, hosts))
    }

    #[tokio::test]
    async fn test_edge_blocklist_null_sites_is_empty() {
        let (found, hosts) = collect_edge_body(r#"{"sites":null}"#).await.unwrap();

        assert_eq!(found, 0);
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn test_edge_blocklist_missing_or_null_url_is_skipped() {
        let (found, hosts) = collect_edge_body(
            r#"{"sites":[{"id":1},{"url":null},null,{"url":"kept.example"}]}"#,
        )
        .await
        .unwrap();

        assert_eq!(found, 4);
        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains("kept.example"));
        assert!(hosts.contains("www.kept.example"));
        assert!(!hosts.contains(""));
    }

    #[tokio::test]
    async fn test_edge_blocklist_ignores_trailing_data() {
        let (found, hosts) =
            collect_edge_body("{\"sites\":[{\"url\":\"first.example\"}]}\n{}")
                .await
                .unwrap();

        assert_eq!(found, 1);
        assert!(hosts.contains("www.first.example"));
    }

    #[tokio::test]
    async fn test_edge_blocklist_empty_body_fails() {
        let err = collect_edge_body("").await.unwrap_err();
        assert!(matches!(err, HostsError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_extras_source_parses_local_file() {
        let storage = MockStorage::default()
            .with_file("extras.txt", "0.0.0.0 local.example\n")
            .await;

        let source = ExtrasSource::new(storage, "extras.txt");
        let mut hosts = DomainSet::new();

        assert_eq!(source.collect_into(&mut hosts).await.unwrap(), 1);
        assert!(hosts.contains("local.example"));
        assert_eq!(source.label(), EXTRAS_LABEL);
    }

    #[tokio::test]
    async fn test_extras_source_missing_file_is_not_an_error() {
        let source = ExtrasSource::new(MockStorage::default(), "extras.txt");
        let mut hosts = DomainSet::new();

        assert_eq!(source.collect_into(&mut hosts).await.unwrap(), 0);
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn test_extras_source_read_failure_propagates() {
        let storage = MockStorage {
            fail_reads: true,
            ..MockStorage::default()
        };
        let source = ExtrasSource::new(storage, "extras.txt");

        let err = source.collect_into(&mut DomainSet::new()).await.unwrap_err();
        assert!(matches!(err, HostsError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extras_source_without_hosts_fails() {
        let storage = MockStorage::default()
            .with_file("extras.txt", "# nothing yet\n")
            .await;
        let source = ExtrasSource::new(storage, "extras.txt");

        let err = source.collect_into(&mut DomainSet::new()).await.unwrap_err();
        assert!(matches!(err, HostsError::NoHostsFoundError));
    }
}
