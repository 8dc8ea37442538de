use crate::db::TransactionStore;
use crate::error::AppError;
use crate::models::{
    CategoryCount, CombinedData, DashboardData, MonthFilter, PageRequest, PriceRangeCount,
    Statistics, Transaction, TransactionFilter,
};
use std::sync::Arc;

/// 查询服务: 列表、统计、柱状图、饼图、组合数据
pub struct ReportService {
    store: Arc<dyn TransactionStore>,
    default_per_page: u32,
}

impl ReportService {
    pub fn new(store: Arc<dyn TransactionStore>, default_per_page: u32) -> Self {
        Self {
            store,
            default_per_page,
        }
    }

    pub fn default_page(&self) -> PageRequest {
        PageRequest::new(1, self.default_per_page)
    }

    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, AppError> {
        let rows = self.store.find(filter, page).await?;
        tracing::debug!(
            month = ?filter.month.map(MonthFilter::name),
            search = ?filter.search,
            page = page.page,
            per_page = page.per_page,
            rows = rows.len(),
            "list_transactions"
        );
        Ok(rows)
    }

    pub async fn statistics(&self, month: MonthFilter) -> Result<Statistics, AppError> {
        Ok(self.store.statistics(month).await?)
    }

    /// 固定价格区间, 零计数区间同样返回
    pub async fn bar_chart(&self, month: MonthFilter) -> Result<Vec<PriceRangeCount>, AppError> {
        let counts = self.store.price_bucket_counts(month).await?;
        Ok(PriceRangeCount::ladder(&counts))
    }

    pub async fn pie_chart(&self, month: MonthFilter) -> Result<Vec<CategoryCount>, AppError> {
        Ok(self.store.category_counts(month).await?)
    }

    /// 四个查询并发执行, 任一失败则整体失败
    pub async fn combined(&self, month: MonthFilter) -> Result<CombinedData, AppError> {
        let filter = TransactionFilter::for_month(month);
        let (transactions, statistics, bar_chart_data, pie_chart_data) = futures::try_join!(
            self.list_transactions(&filter, self.default_page()),
            self.statistics(month),
            self.bar_chart(month),
            self.pie_chart(month),
        )?;

        Ok(CombinedData {
            transactions,
            statistics,
            bar_chart_data,
            pie_chart_data,
        })
    }

    /// 页面数据: 同一视图状态下的列表、统计、柱状图一次性获取
    pub async fn dashboard(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
        month: MonthFilter,
    ) -> Result<DashboardData, AppError> {
        let (transactions, total_matching, statistics, bar_chart) = futures::try_join!(
            self.list_transactions(filter, page),
            async { Ok::<_, AppError>(self.store.count(filter).await?) },
            self.statistics(month),
            self.bar_chart(month),
        )?;

        Ok(DashboardData {
            transactions,
            total_matching,
            statistics,
            bar_chart,
        })
    }
}
