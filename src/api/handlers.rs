use super::params::{ListQuery, MonthQuery};
use super::AppState;
use crate::error::{ApiError, MessageBody};
use crate::models::{CategoryCount, CombinedData, PriceRangeCount, Statistics, Transaction};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 从种子 URL 初始化数据库 (重复调用会产生重复记录)
pub async fn initialize_database(State(state): State<AppState>) -> Response {
    match state.seeder.initialize().await {
        Ok(inserted) => {
            tracing::info!("Database initialized with {} transactions", inserted);
            let response = MessageBody {
                message: "Database initialized successfully.".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_api("Error initializing database.").into_response(),
    }
}

/// 交易列表: 月份、搜索、分页
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    const FAILURE: &str = "Error fetching transactions.";

    let (filter, page) = query.validate(&state.limits).map_err(|e| e.into_api(FAILURE))?;
    let rows = state
        .reports
        .list_transactions(&filter, page)
        .await
        .map_err(|e| e.into_api(FAILURE))?;
    Ok(Json(rows))
}

/// 月度统计
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, ApiError> {
    const FAILURE: &str = "Error fetching statistics.";

    let month = query.require_month().map_err(|e| e.into_api(FAILURE))?;
    let stats = state.reports.statistics(month).await.map_err(|e| e.into_api(FAILURE))?;
    Ok(Json(stats))
}

/// 柱状图: 价格区间计数
pub async fn bar_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, ApiError> {
    const FAILURE: &str = "Error fetching bar chart data.";

    let month = query.require_month().map_err(|e| e.into_api(FAILURE))?;
    let buckets = state.reports.bar_chart(month).await.map_err(|e| e.into_api(FAILURE))?;
    Ok(Json(buckets))
}

/// 饼图: 分类计数
pub async fn pie_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    const FAILURE: &str = "Error fetching pie chart data.";

    let month = query.require_month().map_err(|e| e.into_api(FAILURE))?;
    let categories = state.reports.pie_chart(month).await.map_err(|e| e.into_api(FAILURE))?;
    Ok(Json(categories))
}

/// 组合数据: 列表、统计、柱状图、饼图
pub async fn combined_data(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedData>, ApiError> {
    const FAILURE: &str = "Error fetching combined data.";

    let month = query.require_month().map_err(|e| e.into_api(FAILURE))?;
    let combined = state.reports.combined(month).await.map_err(|e| e.into_api(FAILURE))?;
    Ok(Json(combined))
}
