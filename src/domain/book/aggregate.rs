//! Book Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{BookError, BookId, Chapter, ChapterId, Section, SnapshotId};

/// Book 聚合根
///
/// 每个请求从一次扁平查询构建一次：
/// - Book 独占其 Chapter 集合，Chapter 独占其 Section 集合
/// - 章节标识在书内为稠密、保序的序列
/// - 指定快照时为只读视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    snapshot: Option<SnapshotId>,
    chapters: Vec<Chapter>,
}

impl Book {
    /// 创建空书籍
    pub fn new(id: BookId, title: impl Into<String>, snapshot: Option<SnapshotId>) -> Self {
        Self {
            id,
            title: title.into(),
            snapshot,
            chapters: Vec::new(),
        }
    }

    /// 从扁平的 (章节, 段落) 行单遍构建章节树
    ///
    /// 行顺序由存储层保证（章节升序，再按段落 order 升序），此处不重新排序：
    /// 与上一行章节相同则追加到当前章节，否则开启新章节。
    pub fn assemble(
        id: BookId,
        title: impl Into<String>,
        snapshot: Option<SnapshotId>,
        rows: impl IntoIterator<Item = (ChapterId, Section)>,
    ) -> Self {
        let mut book = Self::new(id, title, snapshot);

        for (chapter_id, section) in rows {
            match book.chapters.last_mut() {
                Some(chapter) if chapter.id() == chapter_id => chapter.push_section(section),
                _ => book
                    .chapters
                    .push(Chapter::with_sections(chapter_id, vec![section])),
            }
        }

        book
    }

    // Getters
    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn snapshot(&self) -> Option<SnapshotId> {
        self.snapshot
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id() == id)
    }

    /// 按构建顺序遍历章节
    ///
    /// 迭代器借用聚合，遍历期间集合不可被修改；再次调用即可重新遍历。
    pub fn chapters(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    pub fn chapter_ids(&self) -> Vec<ChapterId> {
        self.chapters.iter().map(|c| c.id()).collect()
    }

    fn ensure_writable(&self) -> Result<(), BookError> {
        match self.snapshot {
            Some(snapshot) => {
                tracing::debug!(
                    book_id = %self.id,
                    snapshot = %snapshot,
                    "Rejected write on snapshot"
                );
                Err(BookError::SnapshotReadOnly(self.id))
            }
            None => Ok(()),
        }
    }

    /// 校验能否在 `at` 处插入章节：位置范围为 1..=章节数+1
    pub fn check_insert(&self, at: ChapterId) -> Result<(), BookError> {
        self.ensure_writable()?;

        let max = self.chapters.len() as u32 + 1;
        if at.value() > max {
            return Err(BookError::InvalidChapterOrder(at.value()));
        }
        Ok(())
    }

    /// 校验能否删除章节：章节存在，且不是书中最后一章
    pub fn check_remove(&self, id: ChapterId) -> Result<(), BookError> {
        self.ensure_writable()?;

        if self.chapter(id).is_none() {
            return Err(BookError::ChapterNotFound(id));
        }
        if self.chapters.len() <= 1 {
            return Err(BookError::LastChapter(self.id));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Book {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters()
    }
}
