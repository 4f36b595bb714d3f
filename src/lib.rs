//! WebBook - 多人协作写书的 Web 应用
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍 / 章节 / 段落 / 快照
//! - Settings Context: 每本书的排版设置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（KeyValueStore, Repositories, EditorApi）
//! - Commands / Queries: CQRS 处理器
//! - Lifecycle: 四阶段请求生命周期
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 页面 / AJAX + WebSocket
//! - Memory: 请求级存储
//! - Persistence: SQLite + Sled 存储
//! - Adapters: 编辑器客户端
//! - Worker: 自动保存
//! - Events: 书籍事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
