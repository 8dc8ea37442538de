use crate::error::StoreError;
use crate::models::{
    CategoryCount, MonthFilter, NewTransaction, PageRequest, Statistics, Transaction,
    TransactionFilter, PRICE_BUCKET_COUNT, PRICE_BUCKET_WIDTH,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

/// 单条 INSERT 的最大行数 (6 列 * 1000 远低于 65535 绑定参数上限)
const INSERT_CHUNK_SIZE: usize = 1000;
const INSERT_TIMEOUT: Duration = Duration::from_secs(30);

const MONTH_EXPR: &str = "EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC')::INT";

/// 建表 (不存在时)
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_transactions (
            id           BIGSERIAL PRIMARY KEY,
            title        TEXT NOT NULL DEFAULT '',
            description  TEXT NOT NULL DEFAULT '',
            price        DOUBLE PRECISION NOT NULL,
            date_of_sale TIMESTAMPTZ NOT NULL,
            category     TEXT NOT NULL DEFAULT '',
            sold         BOOLEAN
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// LIKE 模式转义, 搜索词按字面匹配
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TransactionFilter) {
    qb.push(" WHERE TRUE");
    if let Some(month) = filter.month {
        qb.push(format!(" AND {MONTH_EXPR} = "))
            .push_bind(month.number() as i32);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR price::TEXT ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// 分页查询交易 (按 id 升序)
pub async fn list_transactions(
    pool: &PgPool,
    filter: &TransactionFilter,
    page: PageRequest,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let mut qb = QueryBuilder::new(
        "SELECT id, title, description, price, date_of_sale, category, sold FROM product_transactions",
    );
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY id OFFSET ")
        .push_bind(page.offset())
        .push(" LIMIT ")
        .push_bind(page.limit());

    qb.build_query_as::<Transaction>().fetch_all(pool).await
}

/// 统计符合条件的记录数
pub async fn count_transactions(
    pool: &PgPool,
    filter: &TransactionFilter,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM product_transactions");
    push_filter(&mut qb, filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// 月度销售统计
pub async fn statistics(pool: &PgPool, month: MonthFilter) -> Result<Statistics, sqlx::Error> {
    sqlx::query_as::<_, Statistics>(&format!(
        r#"
        SELECT COALESCE(SUM(price), 0)::FLOAT8 AS total_sale_amount,
               COUNT(*) FILTER (WHERE sold IS TRUE) AS total_sold_items,
               COUNT(*) FILTER (WHERE sold IS FALSE) AS total_not_sold_items
        FROM product_transactions
        WHERE {MONTH_EXPR} = $1
        "#
    ))
    .bind(month.number() as i32)
    .fetch_one(pool)
    .await
}

/// 价格区间计数, 区间规则与 `price_bucket` 一致
pub async fn price_bucket_counts(
    pool: &PgPool,
    month: MonthFilter,
) -> Result<[i64; PRICE_BUCKET_COUNT], sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64)>(&format!(
        r#"
        SELECT LEAST(GREATEST(CEIL(price / $2::FLOAT8) - 1, 0), $3::BIGINT)::BIGINT AS bucket,
               COUNT(*) AS count
        FROM product_transactions
        WHERE {MONTH_EXPR} = $1
        GROUP BY bucket
        "#
    ))
    .bind(month.number() as i32)
    .bind(PRICE_BUCKET_WIDTH)
    .bind((PRICE_BUCKET_COUNT - 1) as i64)
    .fetch_all(pool)
    .await?;

    let mut counts = [0i64; PRICE_BUCKET_COUNT];
    for (bucket, count) in rows {
        let idx = usize::try_from(bucket).unwrap_or(0).min(PRICE_BUCKET_COUNT - 1);
        counts[idx] += count;
    }
    Ok(counts)
}

/// 按分类计数, 按首次出现顺序
pub async fn category_counts(
    pool: &PgPool,
    month: MonthFilter,
) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(&format!(
        r#"
        SELECT category, COUNT(*) AS count
        FROM product_transactions
        WHERE {MONTH_EXPR} = $1
        GROUP BY category
        ORDER BY MIN(id)
        "#
    ))
    .bind(month.number() as i32)
    .fetch_all(pool)
    .await
}

/// 批量插入 (单事务, 分块)
pub async fn insert_batch(pool: &PgPool, records: &[NewTransaction]) -> Result<u64, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }

    tracing::debug!("开始批量插入, {} 条记录", records.len());
    let start_time = std::time::Instant::now();

    let insert = async {
        let mut tx = pool.begin().await?;
        let mut affected = 0u64;
        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO product_transactions (title, description, price, date_of_sale, category, sold) ",
            );
            query_builder.push_values(chunk, |mut b, record| {
                b.push_bind(&record.title)
                    .push_bind(&record.description)
                    .push_bind(record.price)
                    .push_bind(record.date_of_sale)
                    .push_bind(&record.category)
                    .push_bind(record.sold);
            });
            affected += query_builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok::<u64, sqlx::Error>(affected)
    };

    match tokio::time::timeout(INSERT_TIMEOUT, insert).await {
        Ok(Ok(affected)) => {
            tracing::info!("✓ INSERT执行成功, 影响 {} 行, 耗时: {:?}", affected, start_time.elapsed());
            Ok(affected)
        }
        Ok(Err(e)) => {
            tracing::error!("✗ INSERT执行失败, 耗时: {:?}, 错误: {:?}", start_time.elapsed(), e);
            Err(StoreError::Database(e))
        }
        Err(_) => {
            tracing::error!("✗ INSERT操作超时 (>{}秒)!", INSERT_TIMEOUT.as_secs());
            Err(StoreError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }
}
