pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod view;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use db::{open_store, MemoryStore, PgStore, TransactionStore};
pub use error::{ApiError, AppError, SeedError, StoreError};
pub use service::{HttpSeedSource, ReportService, SeedLoader, SeedSource, StaticSeedSource};
