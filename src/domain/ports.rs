use crate::domain::model::{MarkupFormat, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn query_params(&self) -> &HashMap<String, String>;
    fn markup_format(&self) -> MarkupFormat;
    fn window(&self) -> usize;
    fn universe(&self) -> RangeInclusive<u32>;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, document: String) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
