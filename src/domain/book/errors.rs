//! Book Context - Errors

use thiserror::Error;

use super::{BookId, ChapterId};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("书籍不存在: {0}")]
    NotFound(BookId),

    #[error("章节不存在: {0}")]
    ChapterNotFound(ChapterId),

    #[error("无效的章节位置: {0}")]
    InvalidChapterOrder(u32),

    #[error("快照是只读的: book {0}")]
    SnapshotReadOnly(BookId),

    #[error("书中至少保留一个章节: book {0}")]
    LastChapter(BookId),
}
