use crate::domain::model::{NanPolicy, OutputFormat, RankingReport, UnitCollection};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn units_file(&self) -> &str;
    fn year(&self) -> Option<&str>;
    fn search_query(&self) -> &str;
    fn top_n(&self) -> Option<usize>;
    fn nan_policy(&self) -> NanPolicy;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    /// When set, report files are bundled into this ZIP archive.
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<UnitCollection>;
    async fn transform(&self, units: UnitCollection) -> Result<RankingReport>;
    async fn load(&self, report: RankingReport) -> Result<String>;
}
