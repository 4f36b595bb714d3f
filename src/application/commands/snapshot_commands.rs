//! Snapshot Commands

use chrono::{DateTime, Utc};

use crate::domain::book::BookId;

/// 创建快照命令
#[derive(Debug, Clone)]
pub struct CreateSnapshot {
    pub book_id: BookId,
    pub at: DateTime<Utc>,
}
