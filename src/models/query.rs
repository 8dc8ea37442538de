use super::{MonthFilter, Transaction};

/// 列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub month: Option<MonthFilter>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn for_month(month: MonthFilter) -> Self {
        Self {
            month: Some(month),
            search: None,
        }
    }

    /// 内存实现与 SQL 条件保持一致:
    /// 标题、描述、价格文本任一包含搜索词 (不区分大小写, 按字面匹配).
    /// 大小写折叠按 Unicode 规则; PostgreSQL `ILIKE` 取决于数据库 locale,
    /// C locale 下只折叠 ASCII 字母, 非 ASCII 搜索词在两种存储下结果可能不同
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(month) = self.month {
            if !month.matches(&tx.date_of_sale) {
                return false;
            }
        }
        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                tx.title.to_lowercase().contains(&needle)
                    || tx.description.to_lowercase().contains(&needle)
                    || price_text(tx.price).to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// 价格文本, 与 PostgreSQL `float8::text` 输出一致:
/// 最短往返数字, 十进制指数在 [-4, 15) 内用定点表示, 否则用 `1e+21` / `1.5e-05` 形式
pub fn price_text(price: f64) -> String {
    if price.is_nan() {
        return "NaN".to_string();
    }
    if price.is_infinite() {
        return if price > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let scientific = format!("{price:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return price.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..15).contains(&exponent) {
        return price.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// 偏移分页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn offset(self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    pub fn limit(self) -> i64 {
        i64::from(self.per_page)
    }
}
