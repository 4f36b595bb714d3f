//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 进程级缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 应用配置（页面上下文）
    #[serde(default)]
    pub app: AppSection,

    /// 编辑器客户端配置
    #[serde(default)]
    pub editor: EditorConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（编辑器客户端使用）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_enabled() -> bool {
    true
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public/assets")
}

fn default_static_path() -> String {
    "/assets".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/webbook.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// sled 目录
    #[serde(default = "default_cache_path")]
    pub path: String,
}

fn default_cache_path() -> String {
    "data/cache.sled".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// 站点根路径，所有页面链接以此为前缀
    #[serde(default)]
    pub url_root: String,

    /// 运行状态（development / production）
    #[serde(default = "default_status")]
    pub status: String,

    /// 是否在页面中输出性能分析信息
    #[serde(default)]
    pub profiler: bool,

    /// 缺少书籍标识时重定向的书籍
    #[serde(default = "default_id")]
    pub default_book_id: i64,

    #[serde(default = "default_id")]
    pub default_user_id: i64,
}

fn default_status() -> String {
    "development".to_string()
}

fn default_id() -> i64 {
    1
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            url_root: String::new(),
            status: default_status(),
            profiler: false,
            default_book_id: default_id(),
            default_user_id: default_id(),
        }
    }
}

/// 编辑器客户端配置
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// 自动保存间隔（毫秒）
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_ms: u64,

    /// 请求超时时间（毫秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_autosave_interval() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_ms: default_autosave_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
