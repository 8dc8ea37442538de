use super::TransactionStore;
use crate::error::StoreError;
use crate::models::{
    price_bucket, CategoryCount, MonthFilter, NewTransaction, PageRequest, Statistics,
    Transaction, TransactionFilter, PRICE_BUCKET_COUNT,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// 内存存储, 查询语义与 PgStore 一致 (按 id 升序, id 从 1 递增)
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn month_rows(&self, month: MonthFilter) -> Vec<Transaction> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|tx| month.matches(&tx.date_of_sale))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert_many(&self, records: &[NewTransaction]) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let mut next_id = rows.last().map_or(1, |tx| tx.id + 1);
        for record in records {
            rows.push(record.with_id(next_id));
            next_id += 1;
        }
        Ok(records.len() as u64)
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, StoreError> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|tx| filter.matches(tx))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<i64, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|tx| filter.matches(tx)).count() as i64)
    }

    async fn statistics(&self, month: MonthFilter) -> Result<Statistics, StoreError> {
        let rows = self.month_rows(month).await;
        Ok(Statistics {
            total_sale_amount: rows.iter().map(|tx| tx.price).sum(),
            total_sold_items: rows.iter().filter(|tx| tx.sold == Some(true)).count() as i64,
            total_not_sold_items: rows.iter().filter(|tx| tx.sold == Some(false)).count() as i64,
        })
    }

    async fn price_bucket_counts(
        &self,
        month: MonthFilter,
    ) -> Result<[i64; PRICE_BUCKET_COUNT], StoreError> {
        let mut counts = [0i64; PRICE_BUCKET_COUNT];
        for tx in self.month_rows(month).await {
            counts[price_bucket(tx.price)] += 1;
        }
        Ok(counts)
    }

    async fn category_counts(&self, month: MonthFilter) -> Result<Vec<CategoryCount>, StoreError> {
        let mut groups: IndexMap<String, i64> = IndexMap::new();
        for tx in self.month_rows(month).await {
            *groups.entry(tx.category).or_insert(0) += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, price: f64, date: &str, category: &str, sold: Option<bool>) -> NewTransaction {
        NewTransaction {
            title: title.to_string(),
            description: String::new(),
            price,
            date_of_sale: crate::models::parse_sale_date(date).unwrap(),
            category: category.to_string(),
            sold,
        }
    }

    fn march() -> MonthFilter {
        MonthFilter::parse("March").unwrap()
    }

    #[tokio::test]
    async fn assigns_increasing_ids_across_inserts() {
        let store = MemoryStore::new();
        store.insert_many(&[record("A", 1.0, "2021-03-01", "x", None)]).await.unwrap();
        store
            .insert_many(&[
                record("B", 2.0, "2021-03-02", "x", None),
                record("C", 3.0, "2021-03-03", "x", None),
            ])
            .await
            .unwrap();

        let all = store
            .find(&TransactionFilter::default(), PageRequest::new(1, 10))
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn unset_sold_is_counted_as_neither() {
        let store = MemoryStore::new();
        store
            .insert_many(&[
                record("A", 10.0, "2021-03-01", "x", Some(true)),
                record("B", 20.0, "2021-03-02", "x", Some(false)),
                record("C", 30.0, "2021-03-03", "x", None),
            ])
            .await
            .unwrap();

        let stats = store.statistics(march()).await.unwrap();
        assert_eq!(stats.total_sale_amount, 60.0);
        assert_eq!(stats.total_sold_items, 1);
        assert_eq!(stats.total_not_sold_items, 1);
        let total = store.count(&TransactionFilter::for_month(march())).await.unwrap();
        assert!(stats.total_sold_items + stats.total_not_sold_items <= total);
    }

    #[tokio::test]
    async fn empty_month_sums_to_zero() {
        let store = MemoryStore::new();
        store
            .insert_many(&[record("A", 10.0, "2021-04-01", "x", Some(true))])
            .await
            .unwrap();

        let stats = store.statistics(march()).await.unwrap();
        assert_eq!(
            stats,
            Statistics { total_sale_amount: 0.0, total_sold_items: 0, total_not_sold_items: 0 }
        );
        assert!(store.category_counts(march()).await.unwrap().is_empty());
        assert_eq!(store.price_bucket_counts(march()).await.unwrap(), [0; PRICE_BUCKET_COUNT]);
    }

    #[tokio::test]
    async fn categories_keep_first_seen_order() {
        let store = MemoryStore::new();
        store
            .insert_many(&[
                record("A", 10.0, "2021-03-01", "electronics", None),
                record("B", 10.0, "2021-03-01", "jewelery", None),
                record("C", 10.0, "2021-03-01", "electronics", None),
                record("D", 10.0, "2021-05-01", "clothing", None),
            ])
            .await
            .unwrap();

        let counts = store.category_counts(march()).await.unwrap();
        assert_eq!(
            counts,
            vec![
                CategoryCount { category: "electronics".to_string(), count: 2 },
                CategoryCount { category: "jewelery".to_string(), count: 1 },
            ]
        );
    }
}
