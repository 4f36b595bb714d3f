//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::book::{BookId, ChapterId, Section, SectionId, SectionKind, Snapshot, SnapshotId};
use crate::domain::settings::Settings;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 书籍记录
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// 段落记录（扁平行，按章节、段落顺序返回）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: i64,
    pub book_id: i64,
    pub chapter_id: u32,
    pub kind: SectionKind,
    pub order: u32,
    pub content: String,
}

impl SectionRecord {
    /// 转换为聚合构建所需的 (章节, 段落) 行；章节标识无效时返回 None
    pub fn into_row(self) -> Option<(ChapterId, Section)> {
        let chapter_id = ChapterId::new(self.chapter_id)?;
        let section = Section::new(SectionId::new(self.id), self.kind, self.order, self.content);
        Some((chapter_id, section))
    }
}

/// 删除章节的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterDeletion {
    Deleted,
    /// 章节不存在
    Missing,
    /// 删除后书中将没有章节，事务已回滚
    LastChapter,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 根据 ID 查找书籍
    async fn find_by_id(&self, id: BookId) -> Result<Option<BookRecord>, RepositoryError>;

    /// 一次查询获取书籍全部段落（可固定到快照）
    ///
    /// 顺序：chapter_id 升序，然后 section_order 升序
    async fn find_sections(
        &self,
        book_id: BookId,
        snapshot: Option<SnapshotId>,
    ) -> Result<Vec<SectionRecord>, RepositoryError>;

    /// 在指定位置插入章节（事务内：后续章节 +1，写入标题与空段落）
    ///
    /// 返回新章节的段落
    async fn insert_chapter(
        &self,
        book_id: BookId,
        at: ChapterId,
        title: &str,
    ) -> Result<Vec<SectionRecord>, RepositoryError>;

    /// 删除章节（事务内：删除段落，重新统计剩余章节，后续章节 -1）
    ///
    /// 剩余章节数在同一事务内统计，不依赖请求开始时读到的章节数
    async fn delete_chapter(
        &self,
        book_id: BookId,
        chapter: ChapterId,
    ) -> Result<ChapterDeletion, RepositoryError>;

    /// 更新段落内容与顺序，返回是否命中一行
    async fn update_section(
        &self,
        book_id: BookId,
        section_id: SectionId,
        order: u32,
        content: &str,
    ) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Snapshot Repository
// ============================================================================

/// Snapshot Repository Port
#[async_trait]
pub trait SnapshotRepositoryPort: Send + Sync {
    /// 书籍的所有快照（最新在前）
    async fn list(&self, book_id: BookId) -> Result<Vec<Snapshot>, RepositoryError>;

    /// 快照是否存在
    async fn exists(&self, book_id: BookId, id: SnapshotId) -> Result<bool, RepositoryError>;

    /// 将当前段落复制为新快照
    async fn create(&self, book_id: BookId, id: SnapshotId) -> Result<Snapshot, RepositoryError>;
}

// ============================================================================
// Settings Repository
// ============================================================================

/// Settings Repository Port
#[async_trait]
pub trait SettingsRepositoryPort: Send + Sync {
    /// 获取书籍设置
    async fn find(&self, book_id: BookId) -> Result<Option<Settings>, RepositoryError>;

    /// 隐式创建默认设置（已存在则不变）并返回当前设置
    async fn find_or_create(&self, book_id: BookId) -> Result<Settings, RepositoryError>;

    /// 保存设置（全量更新），返回是否命中一行
    async fn save(&self, settings: &Settings) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Entity Repository
// ============================================================================

/// 书中实体（角色等）
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub id: i64,
    pub book_id: BookId,
    pub kind: String,
    pub name: String,
    pub description: String,
}

/// Entity Repository Port
#[async_trait]
pub trait EntityRepositoryPort: Send + Sync {
    async fn find(
        &self,
        book_id: BookId,
        entity_id: i64,
    ) -> Result<Option<EntityRecord>, RepositoryError>;

    /// 书中全部实体，按名称排序
    async fn list(&self, book_id: BookId) -> Result<Vec<EntityRecord>, RepositoryError>;
}
