use crate::domain::model::{DomainSet, Harvest, HostsDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Like `read_file`, but a missing file yields `Ok(None)`.
    fn read_optional_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sources_file(&self) -> &str;
    fn extras_file(&self) -> &str;
    fn output_file(&self) -> &str;
    fn edge_endpoint(&self) -> &str;
}

/// Something that contributes host names to a run.
#[async_trait]
pub trait HostSource: Send + Sync {
    fn label(&self) -> &str;

    /// Adds this source's hosts to `hosts`, returning how many it found.
    async fn collect_into(&self, hosts: &mut DomainSet) -> Result<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Harvest>;
    async fn transform(&self, harvest: Harvest) -> Result<HostsDocument>;
    async fn load(&self, document: HostsDocument) -> Result<String>;
}
