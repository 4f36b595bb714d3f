//! Entity Queries

use crate::domain::book::BookId;

/// 获取书中实体（角色）
#[derive(Debug, Clone)]
pub struct GetEntity {
    pub book_id: BookId,
    pub entity_id: i64,
}

/// 列出书中实体（角色列表）
#[derive(Debug, Clone)]
pub struct ListEntities {
    pub book_id: BookId,
}
