//! Event Publisher Implementation
//!
//! 书籍事件推送：同一本书的其他编辑器据此重新索引

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// 每本书的事件通道容量
const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BookEvent {
    /// 插入章节
    ChapterInserted { book_id: i64, chapter_id: u32 },
    /// 删除章节
    ChapterDeleted { book_id: i64, chapter_id: u32 },
    /// 段落更新
    SectionUpdated { book_id: i64, section_id: i64 },
    /// 设置更新
    SettingsUpdated { book_id: i64 },
    /// 创建快照
    SnapshotCreated { book_id: i64, snapshot: i64 },
}

impl BookEvent {
    pub fn book_id(&self) -> i64 {
        match self {
            BookEvent::ChapterInserted { book_id, .. }
            | BookEvent::ChapterDeleted { book_id, .. }
            | BookEvent::SectionUpdated { book_id, .. }
            | BookEvent::SettingsUpdated { book_id }
            | BookEvent::SnapshotCreated { book_id, .. } => *book_id,
        }
    }

    /// 是否改变了章节结构（需要客户端重新索引）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BookEvent::ChapterInserted { .. } | BookEvent::ChapterDeleted { .. }
        )
    }
}

/// 事件发布器
pub struct EventPublisher {
    /// book_id -> broadcast sender
    book_channels: DashMap<i64, broadcast::Sender<BookEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            book_channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅某本书的事件
    pub fn subscribe(&self, book_id: i64) -> broadcast::Receiver<BookEvent> {
        self.book_channels
            .entry(book_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 没有订阅者的通道可以回收
    pub fn release(&self, book_id: i64) {
        self.book_channels
            .remove_if(&book_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 当前有编辑器连接的书籍数
    pub fn open_books(&self) -> usize {
        self.book_channels.len()
    }

    pub fn subscriber_count(&self, book_id: i64) -> usize {
        self.book_channels
            .get(&book_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// 发布事件到对应书籍的通道
    pub fn publish(&self, event: BookEvent) {
        let book_id = event.book_id();
        if let Some(sender) = self.book_channels.get(&book_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    book_id,
                    error = %e,
                    "Failed to publish book event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
