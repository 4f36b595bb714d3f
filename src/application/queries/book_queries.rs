//! Book Queries

use crate::domain::book::{BookId, SnapshotId};

/// 加载书籍聚合（可固定到快照）
#[derive(Debug, Clone)]
pub struct LoadBook {
    pub book_id: BookId,
    pub snapshot: Option<SnapshotId>,
}

/// 列出书籍快照
#[derive(Debug, Clone)]
pub struct ListSnapshots {
    pub book_id: BookId,
}
