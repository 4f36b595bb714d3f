//! SQLite Snapshot Repository

use async_trait::async_trait;

use super::DbPool;
use crate::application::ports::{RepositoryError, SnapshotRepositoryPort};
use crate::domain::book::{BookId, Snapshot, SnapshotId};

/// SQLite Snapshot Repository
pub struct SqliteSnapshotRepository {
    pool: DbPool,
}

impl SqliteSnapshotRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotRepositoryPort for SqliteSnapshotRepository {
    async fn list(&self, book_id: BookId) -> Result<Vec<Snapshot>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT snapshot_created FROM snapshots WHERE book_id = ? ORDER BY snapshot_created DESC",
        )
        .bind(book_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(created,)| Snapshot::new(book_id, SnapshotId::new(created)))
            .collect())
    }

    async fn exists(&self, book_id: BookId, id: SnapshotId) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM snapshots WHERE book_id = ? AND snapshot_created = ?",
        )
        .bind(book_id.value())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn create(&self, book_id: BookId, id: SnapshotId) -> Result<Snapshot, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("INSERT INTO snapshots (book_id, snapshot_created) VALUES (?, ?)")
            .bind(book_id.value())
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let copied = sqlx::query(
            r#"
            INSERT INTO snapshot_sections
                (book_id, snapshot_created, section_id, chapter_id, section_type, section_order, section_content)
            SELECT book_id, ?, section_id, chapter_id, section_type, section_order, section_content
            FROM sections
            WHERE book_id = ?
            "#,
        )
        .bind(id.value())
        .bind(book_id.value())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .rows_affected();

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            book_id = %book_id,
            snapshot = %id,
            sections = copied,
            "Snapshot rows copied"
        );
        Ok(Snapshot::new(book_id, id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig, SqliteBookRepository};
    use super::*;
    use crate::application::ports::BookRepositoryPort;
    use crate::domain::book::{ChapterId, SectionId};

    #[tokio::test]
    async fn test_snapshot_is_frozen_copy() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let books = SqliteBookRepository::new(pool.clone());
        let snapshots = SqliteSnapshotRepository::new(pool);
        let book_id = BookId::new(1);
        let id = SnapshotId::new(1_700_000_000);

        snapshots.create(book_id, id).await.unwrap();
        books
            .insert_chapter(book_id, ChapterId::new(2).unwrap(), "Later")
            .await
            .unwrap();
        let first = books.find_sections(book_id, None).await.unwrap()[0].clone();
        books
            .update_section(book_id, SectionId::new(first.id), first.order, "Renamed")
            .await
            .unwrap();

        let frozen = books.find_sections(book_id, Some(id)).await.unwrap();
        assert_eq!(frozen.len(), 2);
        assert_eq!(frozen[0].content, "Chapter one");
        assert!(snapshots.exists(book_id, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let snapshots = SqliteSnapshotRepository::new(pool);
        let book_id = BookId::new(1);

        assert!(snapshots.list(book_id).await.unwrap().is_empty());

        snapshots.create(book_id, SnapshotId::new(100)).await.unwrap();
        snapshots.create(book_id, SnapshotId::new(300)).await.unwrap();
        snapshots.create(book_id, SnapshotId::new(200)).await.unwrap();

        let ids: Vec<i64> = snapshots
            .list(book_id)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id().value())
            .collect();
        assert_eq!(ids, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_duplicate_snapshot_fails() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let snapshots = SqliteSnapshotRepository::new(pool);

        snapshots.create(BookId::new(1), SnapshotId::new(5)).await.unwrap();
        let result = snapshots.create(BookId::new(1), SnapshotId::new(5)).await;

        assert!(matches!(result, Err(RepositoryError::DatabaseError(_))));
    }
}
