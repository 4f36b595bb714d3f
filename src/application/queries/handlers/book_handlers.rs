//! Book Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    decode, encode, BookRepositoryPort, KeyValueStore, SectionRecord, SnapshotRepositoryPort,
    StoreError,
};
use crate::application::queries::{ListSnapshots, LoadBook};
use crate::domain::book::{Book, BookError, BookId, Snapshot, SnapshotId};

/// 进程级缓存（字节值）
pub type ByteCache = dyn KeyValueStore<Value = Vec<u8>>;

/// 快照段落的缓存 key
pub fn snapshot_cache_key(book_id: BookId, snapshot: SnapshotId) -> String {
    format!("snapshot:{}:{}", book_id, snapshot)
}

// ============================================================================
// LoadBook
// ============================================================================

/// LoadBook Handler
///
/// 一次扁平查询获取全部段落，再单遍组装为章节树。
/// 快照内容不可变，其段落行缓存在进程级缓存中。
pub struct LoadBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    snapshot_repo: Arc<dyn SnapshotRepositoryPort>,
    cache: Arc<ByteCache>,
}

impl LoadBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        snapshot_repo: Arc<dyn SnapshotRepositoryPort>,
        cache: Arc<ByteCache>,
    ) -> Self {
        Self {
            book_repo,
            snapshot_repo,
            cache,
        }
    }

    pub async fn handle(&self, query: LoadBook) -> Result<Book, ApplicationError> {
        let record = self
            .book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or(BookError::NotFound(query.book_id))?;

        let rows = match query.snapshot {
            Some(snapshot) => self.snapshot_sections(query.book_id, snapshot).await?,
            None => self.book_repo.find_sections(query.book_id, None).await?,
        };

        let book = Book::assemble(
            record.id,
            record.title,
            query.snapshot,
            rows.into_iter().filter_map(|row| {
                let section_id = row.id;
                let chapter_id = row.chapter_id;
                let converted = row.into_row();
                if converted.is_none() {
                    tracing::warn!(
                        section_id,
                        chapter_id,
                        "Skipping section with invalid chapter"
                    );
                }
                converted
            }),
        );

        tracing::debug!(
            book_id = %book.id(),
            chapters = book.chapter_count(),
            snapshot = ?query.snapshot,
            "Book assembled"
        );

        Ok(book)
    }

    async fn snapshot_sections(
        &self,
        book_id: BookId,
        snapshot: SnapshotId,
    ) -> Result<Vec<SectionRecord>, ApplicationError> {
        // 缓存不随快照删除而失效，先确认快照仍存在
        if !self.snapshot_repo.exists(book_id, snapshot).await? {
            return Err(ApplicationError::not_found("Snapshot", snapshot));
        }

        let key = snapshot_cache_key(book_id, snapshot);

        if self.cache.has(&key)? {
            match self.cache.get(&key).and_then(|bytes| decode::<Vec<SectionRecord>>(&bytes)) {
                Ok(rows) => return Ok(rows),
                // 两次调用之间可能已被其他请求删除或写入了不兼容数据
                Err(e) => tracing::warn!(key = %key, error = %e, "Snapshot cache read failed"),
            }
        }

        let rows = self.book_repo.find_sections(book_id, Some(snapshot)).await?;

        match self.cache.put(&key, encode(&rows)?, false) {
            Ok(_) | Err(StoreError::AlreadyExists(_)) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "Snapshot cache write failed"),
        }

        Ok(rows)
    }
}

// ============================================================================
// ListSnapshots
// ============================================================================

/// ListSnapshots Handler
pub struct ListSnapshotsHandler {
    snapshot_repo: Arc<dyn SnapshotRepositoryPort>,
}

impl ListSnapshotsHandler {
    pub fn new(snapshot_repo: Arc<dyn SnapshotRepositoryPort>) -> Self {
        Self { snapshot_repo }
    }

    pub async fn handle(&self, query: ListSnapshots) -> Result<Vec<Snapshot>, ApplicationError> {
        Ok(self.snapshot_repo.list(query.book_id).await?)
    }
}
