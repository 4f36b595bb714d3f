//! WebBook - 多人协作写书
//!
//! 启动流程：配置 → 日志 → 存储 → 应用状态 → HTTP 服务器

use std::sync::Arc;

use webbook::application::LifecycleConfig;
use webbook::config::{load_config, print_config, AppConfig};
use webbook::infrastructure::events::EventPublisher;
use webbook::infrastructure::http::{AppState, HttpServer, ServerConfig};
use webbook::infrastructure::persistence::sled::{SledCacheConfig, SledCacheStore};
use webbook::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteBookRepository, SqliteEntityRepository,
    SqliteSettingsRepository, SqliteSnapshotRepository,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},webbook={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("WebBook - collaborative book writing");
    print_config(&config);

    // 确保数据目录存在
    for path in [&config.database.path, &config.cache.path] {
        if let Some(parent) = std::path::Path::new(path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database initialized");

    // 进程级缓存
    let cache = Arc::new(SledCacheStore::new(&SledCacheConfig {
        db_path: config.cache.path.clone(),
    })?);

    let lifecycle_config = LifecycleConfig {
        default_book_id: config.app.default_book_id,
        default_user_id: config.app.default_user_id,
        url_root: config.app.url_root.clone(),
        app_status: config.app.status.clone(),
        app_profile: config.app.profiler,
    };

    let state = AppState::new(
        Arc::new(SqliteBookRepository::new(pool.clone())),
        Arc::new(SqliteSnapshotRepository::new(pool.clone())),
        Arc::new(SqliteSettingsRepository::new(pool.clone())),
        Arc::new(SqliteEntityRepository::new(pool.clone())),
        cache.clone(),
        Arc::new(EventPublisher::new()),
        lifecycle_config,
    );

    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            config.server.static_files.path.clone(),
            config.server.static_files.dir.clone(),
        );
    }

    let server = HttpServer::new(server_config, Arc::new(state));

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    if let Err(e) = cache.flush() {
        tracing::warn!(error = %e, "Failed to flush cache");
    }
    pool.close().await;

    tracing::info!("Server shutdown complete");

    Ok(())
}
