use crate::domain::model::{FeedItem, Report};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn congress(&self) -> u32;
    fn today(&self) -> NaiveDate;
    fn feed_url(&self) -> String;
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn request_timeout(&self) -> Option<Duration>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<FeedItem>>;
    async fn transform(&self, items: Vec<FeedItem>) -> Result<Report>;
    async fn load(&self, report: Report) -> Result<String>;
}
