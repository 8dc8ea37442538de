use super::{pool::create_pool, queries, MemoryStore};
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::{
    CategoryCount, MonthFilter, NewTransaction, PageRequest, Statistics, Transaction,
    TransactionFilter, PRICE_BUCKET_COUNT,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// 使用内存存储的连接串前缀
pub const MEMORY_URL_PREFIX: &str = "memory://";

/// 交易存储: 注入到各个请求处理器中的存储句柄
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// 批量插入, 返回插入行数 (不去重)
    async fn insert_many(&self, records: &[NewTransaction]) -> Result<u64, StoreError>;

    async fn find(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, StoreError>;

    async fn count(&self, filter: &TransactionFilter) -> Result<i64, StoreError>;

    async fn statistics(&self, month: MonthFilter) -> Result<Statistics, StoreError>;

    async fn price_bucket_counts(
        &self,
        month: MonthFilter,
    ) -> Result<[i64; PRICE_BUCKET_COUNT], StoreError>;

    async fn category_counts(&self, month: MonthFilter) -> Result<Vec<CategoryCount>, StoreError>;

    /// 关闭底层连接
    async fn close(&self);
}

/// PostgreSQL 存储
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 建立连接池并确保表存在
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = create_pool(config).await?;
        Self::from_pool(pool).await
    }

    /// 使用已有连接池, 确保表存在
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        queries::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn insert_many(&self, records: &[NewTransaction]) -> Result<u64, StoreError> {
        queries::insert_batch(&self.pool, records).await
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(queries::list_transactions(&self.pool, filter, page).await?)
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<i64, StoreError> {
        Ok(queries::count_transactions(&self.pool, filter).await?)
    }

    async fn statistics(&self, month: MonthFilter) -> Result<Statistics, StoreError> {
        Ok(queries::statistics(&self.pool, month).await?)
    }

    async fn price_bucket_counts(
        &self,
        month: MonthFilter,
    ) -> Result<[i64; PRICE_BUCKET_COUNT], StoreError> {
        Ok(queries::price_bucket_counts(&self.pool, month).await?)
    }

    async fn category_counts(&self, month: MonthFilter) -> Result<Vec<CategoryCount>, StoreError> {
        Ok(queries::category_counts(&self.pool, month).await?)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// 按连接串打开存储: `memory://` 使用内存存储, 其余按 PostgreSQL 处理
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn TransactionStore>, StoreError> {
    if config.url.starts_with(MEMORY_URL_PREFIX) {
        tracing::warn!("Using in-memory transaction store, data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = PgStore::connect(config).await?;
    tracing::info!("Database pool created");
    Ok(Arc::new(store))
}
