use product_transactions::{create_router, open_store, AppConfig, AppState, HttpSeedSource};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::load()?;

    // 初始化日志 - 使用本地时间格式
    let level = config.log.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .init();

    info!("Starting server with config: {:?}", config);

    // 打开存储 (启动时打开, 关闭服务后释放)
    let store = open_store(&config.database).await?;
    let seed_source = Arc::new(HttpSeedSource::new(config.seed.url.clone())?);
    let state = AppState::new(store.clone(), seed_source, config.query);

    let app = create_router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /api/initialize-database");
    info!("  GET /api/transactions?month=&searchText=&page=&perPage=");
    info!("  GET /api/statistics?month=");
    info!("  GET /api/bar-chart?month=");
    info!("  GET /api/pie-chart?month=");
    info!("  GET /api/combined-data?month=");
    info!("  GET /                     - Transactions dashboard");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing transaction store");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
