//! Section Commands

use crate::domain::book::{BookId, SectionId};

/// 更新段落命令
#[derive(Debug, Clone)]
pub struct UpdateSection {
    pub book_id: BookId,
    pub section_id: SectionId,
    pub order: u32,
    pub content: String,
}
