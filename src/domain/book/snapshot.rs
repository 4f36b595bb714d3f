//! Book Context - Snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, SnapshotId};

/// 快照 - 书籍在某一时间点的只读视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    book_id: BookId,
    id: SnapshotId,
}

impl Snapshot {
    pub fn new(book_id: BookId, id: SnapshotId) -> Self {
        Self { book_id, id }
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// 创建时间
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.id.value(), 0).unwrap_or_default()
    }
}
