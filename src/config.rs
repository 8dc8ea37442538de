use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 可选配置文件 (工作目录下, 不存在时忽略)
pub const CONFIG_FILE: &str = "product-transactions";

pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub query: QueryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://...` 或 `memory://`
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub url: String,
}

/// 分页参数限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/product_transactions".to_string(),
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            seed: SeedConfig {
                url: DEFAULT_SEED_URL.to_string(),
            },
            query: QueryConfig::default(),
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

impl AppConfig {
    /// 分层加载: 默认值 -> 配置文件 -> APP_ 环境变量 -> PORT / DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("database.acquire_timeout_secs", defaults.database.acquire_timeout_secs)?
            .set_default("seed.url", defaults.seed.url)?
            .set_default("query.default_per_page", i64::from(defaults.query.default_per_page))?
            .set_default("query.max_per_page", i64::from(defaults.query.max_per_page))?
            .set_default("log.level", defaults.log.level)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.seed.url, DEFAULT_SEED_URL);
        assert_eq!(config.query, QueryConfig { default_per_page: 10, max_per_page: 100 });
        assert_eq!(config.log.level, "info");
    }
}
