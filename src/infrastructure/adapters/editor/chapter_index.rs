//! Chapter Index - 客户端章节顺序
//!
//! 编辑器本地维护的章节标识集合，与服务端的稠密编号保持一致。

use crate::application::ports::{EditorApiPort, EditorError};
use crate::domain::book::{shift_for_delete, shift_for_insert, BookId, ChapterId};

/// 本地章节索引
#[derive(Debug, Clone)]
pub struct ChapterIndex {
    book_id: BookId,
    ids: Vec<ChapterId>,
}

impl ChapterIndex {
    pub fn new(book_id: BookId, ids: impl IntoIterator<Item = ChapterId>) -> Self {
        let mut index = Self {
            book_id,
            ids: Vec::new(),
        };
        index.reindex(ids);
        index
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn ids(&self) -> &[ChapterId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 结构变化后重新解析章节集合
    pub fn reindex(&mut self, ids: impl IntoIterator<Item = ChapterId>) {
        self.ids = ids.into_iter().collect();
        self.ids.sort();
        self.ids.dedup();
    }

    /// 在 `at` 处插入章节
    ///
    /// 请求发出前先把本地 >= at 的章节 +1；请求失败时恢复原编号。
    pub async fn insert(
        &mut self,
        api: &dyn EditorApiPort,
        at: ChapterId,
    ) -> Result<String, EditorError> {
        let book_id = self.book_id;
        shift_for_insert(self.ids.iter_mut(), at);

        match api.insert_chapter(book_id, at).await {
            Ok(html) => {
                self.ids.push(at);
                self.ids.sort();
                tracing::debug!(book_id = %book_id, chapter_id = %at, "Chapter inserted");
                Ok(html)
            }
            Err(e) => {
                shift_for_delete(self.ids.iter_mut(), at);
                Err(e)
            }
        }
    }

    /// 删除章节，成功后移除并重新编号后续章节
    pub async fn delete(
        &mut self,
        api: &dyn EditorApiPort,
        chapter: ChapterId,
    ) -> Result<(), EditorError> {
        let book_id = self.book_id;
        api.delete_chapter(book_id, chapter).await?;

        self.ids.retain(|id| *id != chapter);
        shift_for_delete(self.ids.iter_mut(), chapter);
        tracing::debug!(book_id = %book_id, chapter_id = %chapter, "Chapter deleted");
        Ok(())
    }
}
