use crate::config::QueryConfig;
use crate::error::AppError;
use crate::models::{MonthFilter, PageRequest, TransactionFilter};
use serde::Deserialize;

/// GET /api/transactions 查询参数 (原始字符串, 校验后转为强类型)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub month: Option<String>,
    pub search_text: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    pub fn validate(&self, limits: &QueryConfig) -> Result<(TransactionFilter, PageRequest), AppError> {
        let filter = TransactionFilter {
            month: optional_month(self.month.as_deref())?,
            search: non_empty(self.search_text.as_deref()).map(str::to_string),
        };
        let page = parse_bounded("page", self.page.as_deref(), 1, u32::MAX)?;
        let per_page = parse_bounded(
            "perPage",
            self.per_page.as_deref(),
            limits.default_per_page,
            limits.max_per_page,
        )?;
        Ok((filter, PageRequest::new(page, per_page)))
    }
}

/// 仅含月份的查询参数 (统计、柱状图、饼图、组合)
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn require_month(&self) -> Result<MonthFilter, AppError> {
        optional_month(self.month.as_deref())?.ok_or(AppError::MissingMonth)
    }
}

/// 空字符串视为未传
pub(crate) fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

pub(crate) fn optional_month(raw: Option<&str>) -> Result<Option<MonthFilter>, AppError> {
    non_empty(raw).map(MonthFilter::parse).transpose()
}

/// 解析 1..=max 的正整数, 缺省时取 default
pub(crate) fn parse_bounded(
    name: &'static str,
    raw: Option<&str>,
    default: u32,
    max: u32,
) -> Result<u32, AppError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if (1..=max).contains(&value) => Ok(value),
        _ => Err(AppError::InvalidPage {
            name,
            value: raw.to_string(),
        }),
    }
}
