use crate::core::request::{RateRequest, RefinancingRequest};
use crate::domain::model::{CurrencyMapping, RateDto, RefinancingRate};
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
    fn base_url(&self) -> &str;
    fn cache_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}

/// Read-only access to the bank API.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyMapping>>;
    async fn fetch_rates(&self, request: &RateRequest) -> Result<Vec<RateDto>>;
    async fn fetch_refinancing(&self, request: &RefinancingRequest)
        -> Result<Vec<RefinancingRate>>;
}
