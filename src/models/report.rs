use super::Transaction;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 价格区间宽度
pub const PRICE_BUCKET_WIDTH: f64 = 100.0;
/// 区间数量: 0-100, 101-200, ..., 801-900, 901-above
pub const PRICE_BUCKET_COUNT: usize = 10;

/// 价格所属区间下标, 上界包含 (p <= 100 为第 0 档), 负数归入第 0 档
pub fn price_bucket(price: f64) -> usize {
    let idx = (price / PRICE_BUCKET_WIDTH).ceil() - 1.0;
    if idx.is_nan() || idx < 0.0 {
        0
    } else {
        (idx as usize).min(PRICE_BUCKET_COUNT - 1)
    }
}

/// 区间标签, 如 "101 - 200"
pub fn price_range_label(idx: usize) -> String {
    let width = PRICE_BUCKET_WIDTH as usize;
    match idx {
        0 => format!("0 - {width}"),
        i if i >= PRICE_BUCKET_COUNT - 1 => format!("{} - above", i * width + 1),
        i => format!("{} - {}", i * width + 1, (i + 1) * width),
    }
}

/// 月度统计
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sale_amount: f64,
    pub total_sold_items: i64,
    pub total_not_sold_items: i64,
}

/// 柱状图区间计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    pub range: String,
    pub count: i64,
}

impl PriceRangeCount {
    /// 按区间顺序展开计数, 零计数区间同样输出
    pub fn ladder(counts: &[i64; PRICE_BUCKET_COUNT]) -> Vec<Self> {
        counts
            .iter()
            .enumerate()
            .map(|(idx, &count)| Self {
                range: price_range_label(idx),
                count,
            })
            .collect()
    }
}

/// 饼图分类计数
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: i64,
}

/// 组合接口响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    pub transactions: Vec<Transaction>,
    pub statistics: Statistics,
    pub bar_chart_data: Vec<PriceRangeCount>,
    pub pie_chart_data: Vec<CategoryCount>,
}

/// 页面渲染所需数据 (一次协调查询)
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub transactions: Vec<Transaction>,
    pub total_matching: i64,
    pub statistics: Statistics,
    pub bar_chart: Vec<PriceRangeCount>,
}
