//! SQLite Book Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{
    BookRecord, BookRepositoryPort, ChapterDeletion, RepositoryError, SectionRecord,
};
use crate::domain::book::{BookId, ChapterId, SectionId, SectionKind, SnapshotId};

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookRow {
    book_id: i64,
    book_title: String,
    book_created: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: BookId::new(row.book_id),
            title: row.book_title,
            created_at: DateTime::parse_from_rfc3339(&row.book_created)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct SectionRow {
    section_id: i64,
    book_id: i64,
    chapter_id: i64,
    section_type: String,
    section_order: i64,
    section_content: String,
}

impl TryFrom<SectionRow> for SectionRecord {
    type Error = RepositoryError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        let kind = SectionKind::from_str(&row.section_type).ok_or_else(|| {
            RepositoryError::SerializationError(format!(
                "Unknown section type '{}' for section {}",
                row.section_type, row.section_id
            ))
        })?;

        let chapter_id = u32::try_from(row.chapter_id).map_err(|_| {
            RepositoryError::SerializationError(format!(
                "Chapter id {} out of range for section {}",
                row.chapter_id, row.section_id
            ))
        })?;
        let order = u32::try_from(row.section_order).map_err(|_| {
            RepositoryError::SerializationError(format!(
                "Section order {} out of range for section {}",
                row.section_order, row.section_id
            ))
        })?;

        Ok(SectionRecord {
            id: row.section_id,
            book_id: row.book_id,
            chapter_id,
            kind,
            order,
            content: row.section_content,
        })
    }
}

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> =
            sqlx::query_as("SELECT book_id, book_title, book_created FROM books WHERE book_id = ?")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn find_sections(
        &self,
        book_id: BookId,
        snapshot: Option<SnapshotId>,
    ) -> Result<Vec<SectionRecord>, RepositoryError> {
        let rows: Vec<SectionRow> = match snapshot {
            Some(snapshot) => {
                sqlx::query_as(
                    r#"
                    SELECT section_id, book_id, chapter_id, section_type, section_order, section_content
                    FROM snapshot_sections
                    WHERE book_id = ? AND snapshot_created = ?
                    ORDER BY chapter_id ASC, section_order ASC
                    "#,
                )
                .bind(book_id.value())
                .bind(snapshot.value())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT section_id, book_id, chapter_id, section_type, section_order, section_content
                    FROM sections
                    WHERE book_id = ?
                    ORDER BY chapter_id ASC, section_order ASC
                    "#,
                )
                .bind(book_id.value())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(SectionRecord::try_from).collect()
    }

    async fn insert_chapter(
        &self,
        book_id: BookId,
        at: ChapterId,
        title: &str,
    ) -> Result<Vec<SectionRecord>, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        // 一条语句完成后续章节的重新编号
        let shifted = sqlx::query(
            "UPDATE sections SET chapter_id = chapter_id + 1 WHERE book_id = ? AND chapter_id >= ?",
        )
        .bind(book_id.value())
        .bind(i64::from(at.value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .rows_affected();

        let mut records = Vec::with_capacity(2);
        let rows = [(SectionKind::Title, 0u32, title), (SectionKind::Content, 1, "")];
        for (kind, order, content) in rows {
            let id = sqlx::query(
                r#"
                INSERT INTO sections (book_id, chapter_id, section_type, section_order, section_content, section_updated)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(book_id.value())
            .bind(i64::from(at.value()))
            .bind(kind.as_str())
            .bind(i64::from(order))
            .bind(content)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .last_insert_rowid();

            records.push(SectionRecord {
                id,
                book_id: book_id.value(),
                chapter_id: at.value(),
                kind,
                order,
                content: content.to_string(),
            });
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            book_id = %book_id,
            chapter_id = %at,
            shifted_sections = shifted,
            "Chapter rows inserted"
        );
        Ok(records)
    }

    async fn delete_chapter(
        &self,
        book_id: BookId,
        chapter: ChapterId,
    ) -> Result<ChapterDeletion, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        // 先写后读：DELETE 拿到写锁后，并发的删除只能在本事务提交后继续
        let deleted = sqlx::query("DELETE FROM sections WHERE book_id = ? AND chapter_id = ?")
            .bind(book_id.value())
            .bind(i64::from(chapter.value()))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        let remaining: i64 = if deleted == 0 {
            0
        } else {
            sqlx::query_scalar(
                "SELECT COUNT(DISTINCT chapter_id) FROM sections WHERE book_id = ?",
            )
            .bind(book_id.value())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        };

        if deleted == 0 || remaining == 0 {
            tx.rollback()
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            return Ok(if deleted == 0 {
                ChapterDeletion::Missing
            } else {
                ChapterDeletion::LastChapter
            });
        }

        sqlx::query(
            "UPDATE sections SET chapter_id = chapter_id - 1 WHERE book_id = ? AND chapter_id > ?",
        )
        .bind(book_id.value())
        .bind(i64::from(chapter.value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            book_id = %book_id,
            chapter_id = %chapter,
            deleted,
            remaining,
            "Chapter rows deleted"
        );
        Ok(ChapterDeletion::Deleted)
    }

    async fn update_section(
        &self,
        book_id: BookId,
        section_id: SectionId,
        order: u32,
        content: &str,
    ) -> Result<bool, RepositoryError> {
        let affected = sqlx::query(
            r#"
            UPDATE sections
            SET section_order = ?, section_content = ?, section_updated = ?
            WHERE section_id = ? AND book_id = ?
            "#,
        )
        .bind(i64::from(order))
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(section_id.value())
        .bind(book_id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .rows_affected();

        Ok(affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig};
    use super::*;

    async fn setup() -> SqliteBookRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteBookRepository::new(pool)
    }

    fn chapter(n: u32) -> ChapterId {
        ChapterId::new(n).unwrap()
    }

    async fn chapter_titles(repo: &SqliteBookRepository) -> Vec<(u32, String)> {
        repo.find_sections(BookId::new(1), None)
            .await
            .unwrap()
            .into_iter()
            .filter(|s| s.kind == SectionKind::Title)
            .map(|s| (s.chapter_id, s.content))
            .collect()
    }

    #[tokio::test]
    async fn test_negative_chapter_id_is_rejected() {
        let repo = setup().await;
        sqlx::query(
            "INSERT INTO sections (book_id, chapter_id, section_type, section_order, section_updated)
             VALUES (1, -1, 'content', 0, '2024-01-01T00:00:00Z')",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let result = repo.find_sections(BookId::new(1), None).await;

        assert!(matches!(result, Err(RepositoryError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_find_seeded_book() {
        let repo = setup().await;

        let book = repo.find_by_id(BookId::new(1)).await.unwrap().unwrap();
        assert_eq!(book.id, BookId::new(1));
        assert!(repo.find_by_id(BookId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_in_middle_renumbers_trailing_chapters() {
        let repo = setup().await;
        let book_id = BookId::new(1);
        repo.insert_chapter(book_id, chapter(2), "Two").await.unwrap();
        repo.insert_chapter(book_id, chapter(3), "Three").await.unwrap();

        repo.insert_chapter(book_id, chapter(2), "New").await.unwrap();

        let titles = chapter_titles(&repo).await;
        assert_eq!(
            titles,
            vec![
                (1, "Chapter one".to_string()),
                (2, "New".to_string()),
                (3, "Two".to_string()),
                (4, "Three".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_renumbers_trailing_chapters() {
        let repo = setup().await;
        let book_id = BookId::new(1);
        repo.insert_chapter(book_id, chapter(2), "Two").await.unwrap();
        repo.insert_chapter(book_id, chapter(3), "Three").await.unwrap();

        assert_eq!(
            repo.delete_chapter(book_id, chapter(2)).await.unwrap(),
            ChapterDeletion::Deleted
        );
        assert_eq!(
            repo.delete_chapter(book_id, chapter(9)).await.unwrap(),
            ChapterDeletion::Missing
        );

        let titles = chapter_titles(&repo).await;
        assert_eq!(
            titles,
            vec![(1, "Chapter one".to_string()), (2, "Three".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_recounts_inside_transaction() {
        let repo = setup().await;
        let book_id = BookId::new(1);
        repo.insert_chapter(book_id, chapter(2), "Two").await.unwrap();

        // 两个请求都在开始时看到两章
        assert_eq!(
            repo.delete_chapter(book_id, chapter(2)).await.unwrap(),
            ChapterDeletion::Deleted
        );
        assert_eq!(
            repo.delete_chapter(book_id, chapter(1)).await.unwrap(),
            ChapterDeletion::LastChapter
        );

        assert_eq!(
            chapter_titles(&repo).await,
            vec![(1, "Chapter one".to_string())]
        );
    }

    #[tokio::test]
    async fn test_sections_are_ordered_by_chapter_then_order() {
        let repo = setup().await;
        let book_id = BookId::new(1);
        repo.insert_chapter(book_id, chapter(1), "First").await.unwrap();

        let rows = repo.find_sections(book_id, None).await.unwrap();
        let keys: Vec<(u32, u32)> = rows.iter().map(|r| (r.chapter_id, r.order)).collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn test_concurrent_updates_last_write_wins() {
        let repo = setup().await;
        let book_id = BookId::new(1);
        let section = repo
            .find_sections(book_id, None)
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.kind == SectionKind::Content)
            .unwrap();
        let id = SectionId::new(section.id);

        assert!(repo.update_section(book_id, id, 1, "<p>first</p>").await.unwrap());
        assert!(repo.update_section(book_id, id, 1, "<p>second</p>").await.unwrap());

        let stored = repo
            .find_sections(book_id, None)
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.id == section.id)
            .unwrap();
        assert_eq!(stored.content, "<p>second</p>");
    }

    #[tokio::test]
    async fn test_update_section_of_other_book_misses() {
        let repo = setup().await;
        let section = repo.find_sections(BookId::new(1), None).await.unwrap()[0].clone();

        let hit = repo
            .update_section(BookId::new(2), SectionId::new(section.id), 0, "x")
            .await
            .unwrap();

        assert!(!hit);
    }
}
