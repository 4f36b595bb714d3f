//! SQLite Entity Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{EntityRecord, EntityRepositoryPort, RepositoryError};
use crate::domain::book::BookId;

/// SQLite Entity Repository
pub struct SqliteEntityRepository {
    pool: DbPool,
}

impl SqliteEntityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EntityRow {
    entity_id: i64,
    book_id: i64,
    entity_type: String,
    entity_name: String,
    entity_description: String,
}

impl From<EntityRow> for EntityRecord {
    fn from(row: EntityRow) -> Self {
        EntityRecord {
            id: row.entity_id,
            book_id: BookId::new(row.book_id),
            kind: row.entity_type,
            name: row.entity_name,
            description: row.entity_description,
        }
    }
}

#[async_trait]
impl EntityRepositoryPort for SqliteEntityRepository {
    async fn find(
        &self,
        book_id: BookId,
        entity_id: i64,
    ) -> Result<Option<EntityRecord>, RepositoryError> {
        let row: Option<EntityRow> = sqlx::query_as(
            r#"
            SELECT entity_id, book_id, entity_type, entity_name, entity_description
            FROM entities
            WHERE entity_id = ? AND book_id = ?
            "#,
        )
        .bind(entity_id)
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row.map(EntityRecord::from))
    }

    async fn list(&self, book_id: BookId) -> Result<Vec<EntityRecord>, RepositoryError> {
        let rows: Vec<EntityRow> = sqlx::query_as(
            r#"
            SELECT entity_id, book_id, entity_type, entity_name, entity_description
            FROM entities
            WHERE book_id = ?
            ORDER BY entity_name, entity_id
            "#,
        )
        .bind(book_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(EntityRecord::from).collect())
    }
}
