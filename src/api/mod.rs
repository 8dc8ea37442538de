pub mod handlers;
pub mod params;

use crate::config::QueryConfig;
use crate::db::TransactionStore;
use crate::service::{ReportService, SeedLoader, SeedSource};
use crate::view;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use handlers::*;

/// 共享状态: 查询服务、种子加载器、分页限制
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
    pub seeder: Arc<SeedLoader>,
    pub limits: QueryConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        seed_source: Arc<dyn SeedSource>,
        limits: QueryConfig,
    ) -> Self {
        Self {
            reports: Arc::new(ReportService::new(store.clone(), limits.default_per_page)),
            seeder: Arc::new(SeedLoader::new(seed_source, store)),
            limits,
        }
    }
}

/// 构建路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/initialize-database", get(initialize_database))
        .route("/api/transactions", get(list_transactions))
        .route("/api/statistics", get(statistics))
        .route("/api/bar-chart", get(bar_chart))
        .route("/api/pie-chart", get(pie_chart))
        .route("/api/combined-data", get(combined_data))
        // 页面
        .route("/", get(view::page_index))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
