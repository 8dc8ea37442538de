//! 交易看板页面
//!
//! 页面状态 (月份、搜索词、页码) 保存在查询串中, 每个状态由一次协同查询渲染

pub mod render;

use crate::api::params::{non_empty, optional_month, parse_bounded};
use crate::api::AppState;
use crate::error::AppError;
use crate::models::{MonthFilter, PageRequest, TransactionFilter};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use chrono::Month;
use serde::Deserialize;

/// 默认月份
pub const DEFAULT_MONTH: MonthFilter = MonthFilter::new(Month::March);

/// GET / 查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    pub month: Option<String>,
    pub search_text: Option<String>,
    pub page: Option<String>,
}

/// 页面状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub month: MonthFilter,
    pub search_text: String,
    pub page: u32,
    pub per_page: u32,
}

impl ViewState {
    pub fn new(per_page: u32) -> Self {
        Self {
            month: DEFAULT_MONTH,
            search_text: String::new(),
            page: 1,
            per_page,
        }
    }

    pub fn from_query(query: &ViewQuery, per_page: u32) -> Result<Self, AppError> {
        Ok(Self {
            month: optional_month(query.month.as_deref())?.unwrap_or(DEFAULT_MONTH),
            search_text: non_empty(query.search_text.as_deref())
                .unwrap_or_default()
                .to_string(),
            page: parse_bounded("page", query.page.as_deref(), 1, u32::MAX)?,
            per_page,
        })
    }

    /// 切换月份 (保留当前页码)
    pub fn with_month(&self, month: MonthFilter) -> Self {
        Self {
            month,
            ..self.clone()
        }
    }

    /// 修改搜索词 (保留当前页码)
    pub fn with_search(&self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self.clone()
        }
    }

    /// 下一页, 不检查上界
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    /// 上一页, 第 1 页时不变
    pub fn previous_page(&self) -> Self {
        Self {
            page: if self.page > 1 { self.page - 1 } else { self.page },
            ..self.clone()
        }
    }

    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            month: Some(self.month),
            search: non_empty(Some(self.search_text.as_str())).map(str::to_string),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    /// 当前状态对应的页面链接
    pub fn href(&self) -> String {
        let mut href = format!("/?month={}", self.month.name());
        if !self.search_text.is_empty() {
            href.push_str("&searchText=");
            href.push_str(&urlencoding::encode(&self.search_text));
        }
        href.push_str(&format!("&page={}", self.page));
        href
    }
}

/// 交易看板页面
pub async fn page_index(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    const FAILURE: &str = "Error loading transactions dashboard.";

    let view = match ViewState::from_query(&query, state.limits.default_per_page) {
        Ok(view) => view,
        Err(e) => {
            let api = e.into_api(FAILURE);
            return (api.status, Html(render::error_page(&api.message))).into_response();
        }
    };

    match state
        .reports
        .dashboard(&view.filter(), view.page_request(), view.month)
        .await
    {
        Ok(data) => Html(render::render_page(&view, &data)).into_response(),
        Err(e) => {
            let api = e.into_api(FAILURE);
            (api.status, Html(render::error_page(&api.message))).into_response()
        }
    }
}
