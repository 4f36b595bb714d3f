//! Application State
//!
//! 包含所有 Command/Query Handlers 与生命周期监听器

use std::sync::Arc;

use crate::application::queries::handlers::ByteCache;
use crate::application::{
    // Command handlers
    CreateSnapshotHandler, DeleteChapterHandler, InsertChapterHandler, UpdateSectionHandler,
    UpdateSettingsHandler,
    // Query handlers
    GetEntityHandler, ListEntitiesHandler, ListSnapshotsHandler, LoadBookHandler,
    LoadSettingsHandler,
    // Lifecycle
    BookLifecycle, LifecycleConfig, LifecycleListener,
    // Ports
    BookRepositoryPort, EntityRepositoryPort, SettingsRepositoryPort, SnapshotRepositoryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Lifecycle ==========
    pub lifecycle: Arc<dyn LifecycleListener>,
    pub lifecycle_config: LifecycleConfig,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub insert_chapter_handler: InsertChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub update_section_handler: UpdateSectionHandler,
    pub update_settings_handler: UpdateSettingsHandler,
    pub create_snapshot_handler: CreateSnapshotHandler,

    // ========== Query Handlers ==========
    pub list_snapshots_handler: ListSnapshotsHandler,
    pub get_entity_handler: GetEntityHandler,
    pub list_entities_handler: ListEntitiesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        snapshot_repo: Arc<dyn SnapshotRepositoryPort>,
        settings_repo: Arc<dyn SettingsRepositoryPort>,
        entity_repo: Arc<dyn EntityRepositoryPort>,
        cache: Arc<ByteCache>,
        event_publisher: Arc<EventPublisher>,
        lifecycle_config: LifecycleConfig,
    ) -> Self {
        let lifecycle = BookLifecycle::new(
            lifecycle_config.clone(),
            LoadBookHandler::new(book_repo.clone(), snapshot_repo.clone(), cache),
            LoadSettingsHandler::new(settings_repo.clone()),
        );

        Self {
            lifecycle: Arc::new(lifecycle),
            lifecycle_config,
            event_publisher,

            // Command handlers
            insert_chapter_handler: InsertChapterHandler::new(book_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(book_repo.clone()),
            update_section_handler: UpdateSectionHandler::new(book_repo),
            update_settings_handler: UpdateSettingsHandler::new(settings_repo),
            create_snapshot_handler: CreateSnapshotHandler::new(snapshot_repo.clone()),

            // Query handlers
            list_snapshots_handler: ListSnapshotsHandler::new(snapshot_repo),
            get_entity_handler: GetEntityHandler::new(entity_repo.clone()),
            list_entities_handler: ListEntitiesHandler::new(entity_repo),
        }
    }
}
