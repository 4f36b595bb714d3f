//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `WEBBOOK_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `WEBBOOK_SERVER__PORT=8080`
/// - `WEBBOOK_DATABASE__PATH=/data/webbook.db`
/// - `WEBBOOK_APP__URL_ROOT=/books`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.static_files.enabled", true)?
        .set_default("server.static_files.dir", "public/assets")?
        .set_default("server.static_files.path", "/assets")?
        .set_default("database.path", "data/webbook.db")?
        .set_default("database.max_connections", 5)?
        .set_default("cache.path", "data/cache.sled")?
        .set_default("app.url_root", "")?
        .set_default("app.status", "development")?
        .set_default("app.profiler", false)?
        .set_default("app.default_book_id", 1)?
        .set_default("app.default_user_id", 1)?
        .set_default("editor.autosave_interval_ms", 1000)?
        .set_default("editor.request_timeout_ms", 10_000)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("WEBBOOK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.cache.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache path cannot be empty".to_string(),
        ));
    }

    if config.app.default_book_id < 1 || config.app.default_user_id < 1 {
        return Err(ConfigError::ValidationError(
            "Default book and user ids must be positive".to_string(),
        ));
    }

    if config.editor.autosave_interval_ms < 100 {
        return Err(ConfigError::ValidationError(format!(
            "Autosave interval too short: {}ms (minimum 100ms)",
            config.editor.autosave_interval_ms
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {} -> {:?}",
            config.server.static_files.path,
            config.server.static_files.dir
        );
    }
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Cache: {}", config.cache.path);
    tracing::info!("URL Root: {:?}", config.app.url_root);
    tracing::info!("Status: {}", config.app.status);
    tracing::info!("Default Book: {}", config.app.default_book_id);
    tracing::info!("Autosave Interval: {}ms", config.editor.autosave_interval_ms);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
