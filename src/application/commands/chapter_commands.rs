//! Chapter Commands

use std::sync::Arc;

use crate::domain::book::{Book, ChapterId};

/// 插入章节命令
#[derive(Debug, Clone)]
pub struct InsertChapter {
    /// 请求开始时加载的书籍（用于位置校验）
    pub book: Arc<Book>,
    /// 新章节的位置
    pub at: ChapterId,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub book: Arc<Book>,
    pub chapter: ChapterId,
}
