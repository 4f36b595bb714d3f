//! Chapter Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteChapter, InsertChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{BookRepositoryPort, ChapterDeletion};
use crate::domain::book::{BookError, Chapter};

/// 新章节的默认标题
pub const NEW_CHAPTER_TITLE: &str = "Untitled chapter";

// ============================================================================
// InsertChapter
// ============================================================================

/// InsertChapter Handler
pub struct InsertChapterHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl InsertChapterHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    /// 插入章节，返回新章节（供渲染片段）
    pub async fn handle(&self, command: InsertChapter) -> Result<Chapter, ApplicationError> {
        let book = &command.book;
        book.check_insert(command.at)?;

        let records = self
            .book_repo
            .insert_chapter(book.id(), command.at, NEW_CHAPTER_TITLE)
            .await?;

        let sections = records
            .into_iter()
            .filter_map(|record| record.into_row().map(|(_, section)| section))
            .collect();

        tracing::info!(
            book_id = %book.id(),
            chapter_id = %command.at,
            "Chapter inserted"
        );

        Ok(Chapter::with_sections(command.at, sections))
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    /// 书中至少保留一个章节，否则无处插入新章节
    ///
    /// 聚合先按请求开始时的状态校验；存储层在删除事务内再统计一次，
    /// 并发删除同样不会清空书籍。
    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let book = &command.book;
        book.check_remove(command.chapter)?;

        match self.book_repo.delete_chapter(book.id(), command.chapter).await? {
            ChapterDeletion::Deleted => {}
            ChapterDeletion::Missing => {
                return Err(BookError::ChapterNotFound(command.chapter).into());
            }
            ChapterDeletion::LastChapter => {
                tracing::warn!(
                    book_id = %book.id(),
                    chapter_id = %command.chapter,
                    "Concurrent delete would leave the book empty"
                );
                return Err(BookError::LastChapter(book.id()).into());
            }
        }

        tracing::info!(
            book_id = %book.id(),
            chapter_id = %command.chapter,
            "Chapter deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Book, BookId, ChapterId, Section, SectionId, SectionKind};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteBookRepository,
    };

    async fn repo() -> Arc<dyn BookRepositoryPort> {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        Arc::new(SqliteBookRepository::new(pool))
    }

    fn chapter(n: u32) -> ChapterId {
        ChapterId::new(n).unwrap()
    }

    /// 请求开始时看到的书籍：`chapters` 个章节
    fn loaded_book(chapters: u32) -> Arc<Book> {
        let rows = (1..=chapters).map(|n| {
            let section = Section::new(SectionId::new(i64::from(n)), SectionKind::Title, 0, "T");
            (chapter(n), section)
        });
        Arc::new(Book::assemble(BookId::new(1), "Test", None, rows))
    }

    #[tokio::test]
    async fn test_insert_chapter_returns_new_chapter() {
        let handler = InsertChapterHandler::new(repo().await);

        let inserted = handler
            .handle(InsertChapter {
                book: loaded_book(1),
                at: chapter(2),
            })
            .await
            .unwrap();

        assert_eq!(inserted.id(), chapter(2));
        assert_eq!(inserted.title(), Some(NEW_CHAPTER_TITLE));
        assert_eq!(inserted.sections().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_chapter_rejects_gap() {
        let handler = InsertChapterHandler::new(repo().await);

        let result = handler
            .handle(InsertChapter {
                book: loaded_book(1),
                at: chapter(5),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_last_chapter_is_rejected() {
        let handler = DeleteChapterHandler::new(repo().await);

        let result = handler
            .handle(DeleteChapter {
                book: loaded_book(1),
                chapter: ChapterId::FIRST,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::BusinessRuleViolation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_chapter_is_not_found() {
        let handler = DeleteChapterHandler::new(repo().await);

        let result = handler
            .handle(DeleteChapter {
                book: loaded_book(3),
                chapter: chapter(7),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_stale_chapter_count_cannot_empty_book() {
        let repo = repo().await;
        repo.insert_chapter(BookId::new(1), chapter(2), "Two").await.unwrap();
        let handler = DeleteChapterHandler::new(repo.clone());

        // 两个请求都在删除前加载了两章的书籍
        let seen = loaded_book(2);
        handler
            .handle(DeleteChapter {
                book: seen.clone(),
                chapter: chapter(2),
            })
            .await
            .unwrap();
        let result = handler
            .handle(DeleteChapter {
                book: seen,
                chapter: chapter(1),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::BusinessRuleViolation(_))));
        let rows = repo.find_sections(BookId::new(1), None).await.unwrap();
        assert!(rows.iter().all(|row| row.chapter_id == 1));
        assert!(!rows.is_empty());
    }
}
