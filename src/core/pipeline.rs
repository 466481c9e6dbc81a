use crate::core::render::render_hosts;
use crate::core::sources::{EdgeBlocklistSource, ExtrasSource, HostsListSource};
use crate::core::{ConfigProvider, Harvest, HostSource, HostsDocument, Pipeline, Storage};
use crate::domain::model::{parse_source_list, DomainSet};
use crate::utils::error::Result;
use chrono::Utc;
use reqwest::Client;

/// Fetches every configured list into one hosts file.
///
/// Sources run strictly one after another; the first failure ends the run
/// before anything is written.
pub struct HostsPipeline<S: Storage + Clone, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage + Clone, C: ConfigProvider> HostsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn read_source_list(&self) -> Result<Vec<String>> {
        let data = self
            .storage
            .read_file(self.config.sources_file())
            .await
            .map_err(|e| e.context("error opening sources"))?;
        Ok(parse_source_list(&String::from_utf8_lossy(&data)))
    }
}

#[async_trait::async_trait]
impl<S: Storage + Clone, C: ConfigProvider> Pipeline for HostsPipeline<S, C> {
    async fn extract(&self) -> Result<Harvest> {
        let mut hosts = DomainSet::new();
        let mut sources = Vec::new();

        for url in self.read_source_list().await? {
            let source = HostsListSource::new(self.client.clone(), url.as_str());
            source
                .collect_into(&mut hosts)
                .await
                .map_err(|e| {
                    e.context(format!("error updating source {}", source.label()))
                })?;
            sources.push(url);
        }
        sources.sort();

        ExtrasSource::new(self.storage.clone(), self.config.extras_file())
            .collect_into(&mut hosts)
            .await
            .map_err(|e| e.context("error reading extras"))?;

        EdgeBlocklistSource::new(self.client.clone(), self.config.edge_endpoint())
            .collect_into(&mut hosts)
            .await
            .map_err(|e| e.context("error reading Microsoft Edge abusive list"))?;

        Ok(Harvest { hosts, sources })
    }

    async fn transform(&self, harvest: Harvest) -> Result<HostsDocument> {
        Ok(render_hosts(harvest.hosts, &harvest.sources, Utc::now()))
    }

    async fn load(&self, document: HostsDocument) -> Result<String> {
        tracing::debug!(
            "Writing {} domains ({} bytes) to {}",
            document.domain_count,
            document.content.len(),
            self.config.output_file()
        );
        self.storage
            .write_file(self.config.output_file(), document.content.as_bytes())
            .await
            .map_err(|e| e.context("error writing hosts file"))?;

        Ok(self.config.output_file().to_string())
    }
}
