//! Editor API Port - 编辑器客户端出站端口
//!
//! 浏览器端模块（章节、段落编辑、角色查看）对服务端的调用抽象。
//! 每个用户操作只发一次请求，不重试。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{BookId, ChapterId, SectionId};

/// Editor API 错误
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Server rejected request ({status}): {message}")]
    Server { status: u16, message: String },
}

/// 段落更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionUpdate {
    pub section_id: SectionId,
    pub order: u32,
    pub content: String,
}

/// Editor API Port
#[async_trait]
pub trait EditorApiPort: Send + Sync {
    /// 插入章节，返回新章节的 HTML 片段
    async fn insert_chapter(&self, book_id: BookId, at: ChapterId) -> Result<String, EditorError>;

    /// 删除章节
    async fn delete_chapter(&self, book_id: BookId, chapter: ChapterId) -> Result<(), EditorError>;

    /// 更新段落
    async fn update_section(
        &self,
        book_id: BookId,
        update: &SectionUpdate,
    ) -> Result<(), EditorError>;

    /// 查看实体（角色），返回 HTML 片段
    async fn view_entity(&self, book_id: BookId, entity_id: i64) -> Result<String, EditorError>;
}
