//! Settings Queries

use crate::domain::book::BookId;

/// 加载书籍设置（不存在则隐式创建）
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub book_id: BookId,
}
