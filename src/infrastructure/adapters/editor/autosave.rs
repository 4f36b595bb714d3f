//! Autosave Buffer - 段落脏集合
//!
//! 以段落标识为键记录未保存的修改。每次修改分配一个递增的代号，
//! 只有在服务端确认保存成功、且刷新期间没有再次修改时才移除条目。

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{EditorApiPort, SectionUpdate};
use crate::domain::book::{BookId, SectionId};

#[derive(Debug, Clone)]
struct DirtyEntry {
    order: u32,
    content: String,
    generation: u64,
}

/// 一次刷新的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub saved: usize,
    pub failed: usize,
}

/// 自动保存缓冲区
pub struct AutosaveBuffer {
    book_id: BookId,
    dirty: DashMap<SectionId, DirtyEntry>,
    generation: AtomicU64,
}

impl AutosaveBuffer {
    pub fn new(book_id: BookId) -> Self {
        Self {
            book_id,
            dirty: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// 记录段落修改（同一段落只保留最新内容）
    pub fn mark_dirty(&self, section_id: SectionId, order: u32, content: impl Into<String>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.dirty.insert(
            section_id,
            DirtyEntry {
                order,
                content: content.into(),
                generation,
            },
        );
    }

    pub fn is_dirty(&self, section_id: SectionId) -> bool {
        self.dirty.contains_key(&section_id)
    }

    pub fn pending(&self) -> usize {
        self.dirty.len()
    }

    /// 把当前所有脏段落逐个发给服务端
    pub async fn flush(&self, api: &dyn EditorApiPort) -> FlushReport {
        let batch: Vec<(SectionId, DirtyEntry)> = self
            .dirty
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut report = FlushReport::default();

        for (section_id, entry) in batch {
            let update = SectionUpdate {
                section_id,
                order: entry.order,
                content: entry.content,
            };

            match api.update_section(self.book_id, &update).await {
                Ok(()) => {
                    self.dirty.remove_if(&section_id, |_, current| {
                        current.generation == entry.generation
                    });
                    report.saved += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        book_id = %self.book_id,
                        section_id = %section_id,
                        error = %e,
                        "Autosave failed, keeping section dirty"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.saved + report.failed > 0 {
            tracing::debug!(
                book_id = %self.book_id,
                saved = report.saved,
                failed = report.failed,
                "Autosave flush finished"
            );
        }

        report
    }
}
