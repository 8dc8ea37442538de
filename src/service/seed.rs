use crate::db::TransactionStore;
use crate::error::{AppError, SeedError};
use crate::models::NewTransaction;
use async_trait::async_trait;
use std::sync::Arc;

/// 种子数据来源
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, SeedError>;

    /// 日志用描述
    fn describe(&self) -> String;
}

/// 从固定 URL 下载 JSON 数组
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, SeedError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// 内存中的固定种子数据
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    records: Vec<NewTransaction>,
}

impl StaticSeedSource {
    pub fn new(records: Vec<NewTransaction>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, SeedError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }
}

/// 种子加载器: 下载后无条件批量插入, 重复调用会产生重复记录
pub struct SeedLoader {
    source: Arc<dyn SeedSource>,
    store: Arc<dyn TransactionStore>,
}

impl SeedLoader {
    pub fn new(source: Arc<dyn SeedSource>, store: Arc<dyn TransactionStore>) -> Self {
        Self { source, store }
    }

    pub async fn initialize(&self) -> Result<u64, AppError> {
        tracing::info!("Fetching seed data from {}", self.source.describe());
        let records = self.source.fetch().await?;
        tracing::info!("Fetched {} seed records", records.len());

        let inserted = self.store.insert_many(&records).await?;
        tracing::info!("Seed load inserted {} rows", inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    const SEED: &str = r#"[
        {"title":"A","price":50,"dateOfSale":"2021-03-05","category":"x","sold":true},
        {"title":"B","price":150,"dateOfSale":"2021-03-10","category":"y","sold":false}
    ]"#;

    #[tokio::test]
    async fn seeding_twice_duplicates_rows() {
        let store = Arc::new(MemoryStore::new());
        let source = Arc::new(StaticSeedSource::from_json(SEED).unwrap());
        let loader = SeedLoader::new(source, store.clone());

        assert_eq!(loader.initialize().await.unwrap(), 2);
        assert_eq!(loader.initialize().await.unwrap(), 2);
        assert_eq!(store.len().await, 4);
    }

    #[test]
    fn record_without_price_or_date_rejects_the_batch() {
        let missing_price = r#"[
            {"title":"A","price":50,"dateOfSale":"2021-03-05"},
            {"title":"B","dateOfSale":"2021-03-10"}
        ]"#;
        let missing_date = r#"[{"title":"A","price":50}]"#;
        for json in [missing_price, missing_date] {
            let err = StaticSeedSource::from_json(json).unwrap_err();
            assert!(matches!(err, SeedError::Decode(_)), "{json}");
        }
    }

    #[test]
    fn malformed_seed_json_is_a_decode_error() {
        let err = StaticSeedSource::from_json(r#"{"not":"an array"}"#).unwrap_err();
        assert!(matches!(err, SeedError::Decode(_)));
    }
}
