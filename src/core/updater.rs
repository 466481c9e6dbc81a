use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct UpdateEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> UpdateEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting hosts update...");

        // Extract
        tracing::info!("Fetching sources...");
        let harvest = self.pipeline.extract().await?;
        tracing::info!(
            "Collected {} unique domains from {} sources",
            harvest.hosts.len(),
            harvest.sources.len()
        );

        // Transform
        let document = self.pipeline.transform(harvest).await?;
        tracing::debug!("Rendered {} bytes", document.content.len());

        // Load
        let output_path = self.pipeline.load(document).await?;
        tracing::info!(
            "Hosts file written to {} in {:?}",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DomainSet, Harvest, HostsDocument};
    use crate::utils::error::HostsError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingPipeline {
        fail_extract: bool,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Harvest> {
            if self.fail_extract {
                return Err(HostsError::NoHostsFoundError.context("error updating source x"));
            }
            let mut hosts = DomainSet::new();
            hosts.insert("a.example");
            Ok(Harvest {
                hosts,
                sources: vec!["x".to_string()],
            })
        }

        async fn transform(&self, harvest: Harvest) -> Result<HostsDocument> {
            Ok(HostsDocument {
                content: String::new(),
                domain_count: harvest.hosts.len(),
            })
        }

        async fn load(&self, _document: HostsDocument) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok("hosts.txt".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_returns_output_path() {
        let engine = UpdateEngine::new(RecordingPipeline::default());

        assert_eq!(engine.run().await.unwrap(), "hosts.txt");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_skips_load_after_failure() {
        let engine = UpdateEngine::new(RecordingPipeline {
            fail_extract: true,
            ..Default::default()
        });

        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
