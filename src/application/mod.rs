//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（KeyValueStore、Repository、EditorApi）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - lifecycle: 请求生命周期（四阶段分发器）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    CreateSnapshot, DeleteChapter, InsertChapter, UpdateSection, UpdateSettings,
    handlers::{
        CreateSnapshotHandler, DeleteChapterHandler, InsertChapterHandler, UpdateSectionHandler,
        UpdateSettingsHandler,
    },
};

pub use error::ApplicationError;

pub use lifecycle::{
    BookLifecycle, LifecycleConfig, LifecycleDispatcher, LifecycleListener, LifecycleStage,
    RequestInfo, RequestInitOutcome, ViewContext,
};

pub use ports::{
    BookRecord, BookRepositoryPort, ChapterDeletion, EditorApiPort, EditorError, EntityRecord,
    EntityRepositoryPort, KeyValueStore, RepositoryError, SectionRecord, SectionUpdate,
    SettingsRepositoryPort, SnapshotRepositoryPort, StoreError, StoreValue,
};

pub use queries::{
    GetEntity, ListEntities, ListSnapshots, LoadBook, LoadSettings,
    handlers::{
        GetEntityHandler, ListEntitiesHandler, ListSnapshotsHandler, LoadBookHandler,
        LoadSettingsHandler,
    },
};
